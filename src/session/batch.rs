//! Output formats that can be applied to every loaded file in one action.
//!
//! Entries whose type is not known yet (still uploading, or whose upload
//! failed) place no constraint on the result. The resolver is pure, so the UI
//! recomputes it from the current [`SessionState`] on every change.

use super::formats::FileType;
use super::state::SessionState;
use crate::error::SessionError;
use std::collections::BTreeSet;

pub fn batch_formats(session: &SessionState) -> Vec<&'static str> {
    let types: BTreeSet<FileType> = session.entries().filter_map(|e| e.file_type).collect();

    // BTreeSet iterates in table order, so the first type fixes presentation order.
    let mut types = types.into_iter();
    let Some(first) = types.next() else {
        return Vec::new();
    };

    let rest: Vec<FileType> = types.collect();
    first
        .output_formats()
        .iter()
        .copied()
        .filter(|format| rest.iter().all(|t| t.supports(format)))
        .collect()
}

/// Sets `format` on every editable entry that supports it and returns how many changed.
pub fn apply_batch_format(session: &mut SessionState, format: &str) -> Result<usize, SessionError> {
    let mut applied = 0;
    for entry in session.entries_mut() {
        if !entry.is_editable() {
            continue;
        }
        if let Some(canonical) = entry.file_type.and_then(|t| t.find_format(format)) {
            entry.selected_format = Some(canonical);
            applied += 1;
        }
    }

    if applied == 0 {
        tracing::warn!("Batch format {} matched no entries", format);
        return Err(SessionError::InvalidFormat {
            format: format.to_string(),
        });
    }
    tracing::info!("Applied {} to {} files", format, applied);
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::UploadedFile;

    fn add(session: &mut SessionState, name: &str, file_type: Option<FileType>) {
        let id = session.add_file(name, 1).unwrap();
        if let Some(file_type) = file_type {
            session.complete_upload(
                id,
                UploadedFile {
                    file_type,
                    server_filename: name.to_string(),
                    size_bytes: 1,
                    extension: String::new(),
                },
            );
        }
    }

    #[test]
    fn empty_session_offers_nothing() {
        assert!(batch_formats(&SessionState::new()).is_empty());
    }

    #[test]
    fn only_uploading_entries_offer_nothing() {
        let mut session = SessionState::new();
        add(&mut session, "a.jpg", None);
        assert!(batch_formats(&session).is_empty());
    }

    #[test]
    fn single_type_offers_full_table() {
        let mut session = SessionState::new();
        add(&mut session, "a.jpg", Some(FileType::Image));
        add(&mut session, "b.png", Some(FileType::Image));
        assert_eq!(batch_formats(&session), FileType::Image.output_formats());
    }

    #[test]
    fn uploading_entries_do_not_constrain() {
        let mut session = SessionState::new();
        add(&mut session, "a.wav", Some(FileType::Audio));
        add(&mut session, "b.zip", None);
        assert_eq!(batch_formats(&session), FileType::Audio.output_formats());
    }

    #[test]
    fn disjoint_types_offer_nothing() {
        let mut session = SessionState::new();
        add(&mut session, "a.mp3", Some(FileType::Audio));
        add(&mut session, "b.zip", Some(FileType::Archive));
        assert!(batch_formats(&session).is_empty());
    }

    #[test]
    fn overlapping_types_keep_table_order() {
        let mut session = SessionState::new();
        add(&mut session, "song.flac", Some(FileType::Audio));
        add(&mut session, "clip.mp4", Some(FileType::Video));
        // Video comes before audio in the table, so its order wins.
        assert_eq!(batch_formats(&session), vec!["mp3", "wav"]);

        add(&mut session, "deck.pptx", Some(FileType::Pptx));
        assert!(batch_formats(&session).is_empty());
    }

    #[test]
    fn image_and_pptx_share_raster_formats() {
        let mut session = SessionState::new();
        add(&mut session, "deck.pptx", Some(FileType::Pptx));
        add(&mut session, "a.jpg", Some(FileType::Image));
        assert_eq!(batch_formats(&session), vec!["png", "jpg", "jpeg", "pdf"]);
    }

    #[test]
    fn apply_counts_only_supporting_entries() {
        let mut session = SessionState::new();
        add(&mut session, "a.jpg", Some(FileType::Image));
        add(&mut session, "b.pdf", Some(FileType::Pdf));
        add(&mut session, "c.png", None);

        assert_eq!(apply_batch_format(&mut session, "PNG"), Ok(1));
        let formats: Vec<_> = session.entries().map(|e| e.selected_format).collect();
        assert_eq!(formats, vec![Some("png"), Some("txt"), None]);
    }

    #[test]
    fn apply_with_no_match_is_an_error() {
        let mut session = SessionState::new();
        add(&mut session, "a.zip", Some(FileType::Archive));
        assert!(matches!(
            apply_batch_format(&mut session, "mp4"),
            Err(SessionError::InvalidFormat { .. })
        ));
        assert_eq!(session.entries().next().unwrap().selected_format, Some("zip"));
    }
}
