use universal_converter::error::SessionError;
use universal_converter::session::{
    apply_batch_format, batch_formats, EntryId, EntryStatus, FileType, SessionState, UploadedFile,
};

fn uploaded(file_type: FileType, name: &str) -> UploadedFile {
    UploadedFile {
        file_type,
        server_filename: format!("up_{name}"),
        size_bytes: 4096,
        extension: name.rsplit('.').next().unwrap().to_string(),
    }
}

fn drop_file(session: &mut SessionState, name: &str, file_type: FileType) -> EntryId {
    let id = session.add_file(name, 4096).expect("name should be free");
    assert!(session.complete_upload(id, uploaded(file_type, name)));
    id
}

#[test]
fn no_two_active_entries_share_a_name() {
    let mut session = SessionState::new();
    let names = ["a.jpg", "b.png", "a.jpg", "c.mp3", "b.png", "a.jpg"];
    let mut accepted = 0;
    for name in names {
        match session.add_file(name, 1) {
            Ok(_) => accepted += 1,
            Err(SessionError::DuplicateFile(dup)) => assert_eq!(dup, name),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(accepted, 3);
    assert_eq!(session.len(), 3);

    let mut seen: Vec<_> = session.entries().map(|e| e.original_name.clone()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), session.len());
}

#[test]
fn removed_name_can_be_added_again() {
    let mut session = SessionState::new();
    let id = drop_file(&mut session, "report.pdf", FileType::Pdf);
    session.remove(id);
    assert!(session.add_file("report.pdf", 10).is_ok());
}

#[test]
fn resolver_is_empty_for_incompatible_types() {
    let mut session = SessionState::new();
    assert!(batch_formats(&session).is_empty());

    drop_file(&mut session, "voice.mp3", FileType::Audio);
    drop_file(&mut session, "bundle.zip", FileType::Archive);
    assert!(batch_formats(&session).is_empty());
}

#[test]
fn resolver_offers_full_table_for_one_type() {
    let mut session = SessionState::new();
    drop_file(&mut session, "a.csv", FileType::Data);
    drop_file(&mut session, "b.xlsx", FileType::Data);
    assert_eq!(
        batch_formats(&session),
        vec!["csv", "xlsx", "json", "txt", "xml", "html"]
    );
}

#[test]
fn batch_apply_only_changes_selected_format() {
    let mut session = SessionState::new();
    let ids: Vec<_> = ["a.jpg", "b.png", "c.gif"]
        .iter()
        .map(|n| drop_file(&mut session, n, FileType::Image))
        .collect();
    let before: Vec<_> = ids.iter().map(|id| session.get(*id).unwrap().clone()).collect();

    assert_eq!(apply_batch_format(&mut session, "tiff"), Ok(3));

    for (id, old) in ids.iter().zip(before) {
        let new = session.get(*id).unwrap();
        assert_eq!(new.selected_format, Some("tiff"));
        assert_eq!(new.original_name, old.original_name);
        assert_eq!(new.server_filename, old.server_filename);
        assert_eq!(new.status, old.status);
        assert_eq!(new.size_bytes, old.size_bytes);
        assert_eq!(new.result_filename, old.result_filename);
    }
}

#[test]
fn two_images_batch_then_convert_one() {
    let mut session = SessionState::new();
    let a = drop_file(&mut session, "a.jpg", FileType::Image);
    let b = drop_file(&mut session, "b.png", FileType::Image);

    let offered = batch_formats(&session);
    for format in ["webp", "png", "jpg", "gif", "bmp", "tiff", "ico", "pdf"] {
        assert!(offered.contains(&format), "{format} missing from {offered:?}");
    }

    assert_eq!(apply_batch_format(&mut session, "webp"), Ok(2));
    assert_eq!(session.get(a).unwrap().selected_format, Some("webp"));
    assert_eq!(session.get(b).unwrap().selected_format, Some("webp"));

    let job = session.start_conversion(a).unwrap();
    assert_eq!(job.target_format, "webp");
    assert!(session.complete_conversion(a, "a.webp"));

    let a_entry = session.get(a).unwrap();
    assert_eq!(a_entry.status, EntryStatus::Converted);
    assert_eq!(a_entry.result_filename.as_deref(), Some("a.webp"));
    assert_eq!(session.get(b).unwrap().status, EntryStatus::Ready);
    assert_eq!(session.converted_count(), 1);
}

#[test]
fn image_and_audio_offer_no_batch_format() {
    let mut session = SessionState::new();
    drop_file(&mut session, "a.jpg", FileType::Image);
    drop_file(&mut session, "b.mp3", FileType::Audio);
    assert!(batch_formats(&session).is_empty());
}

#[test]
fn removing_last_entry_returns_to_idle() {
    let mut session = SessionState::new();
    let a = drop_file(&mut session, "a.jpg", FileType::Image);
    let b = session.add_file("b.mp4", 1).unwrap();

    session.remove(a);
    session.remove(b);
    assert!(session.is_empty());
    assert_eq!(session.reserved_count(), 0);
    assert!(!session.is_reserved("b.mp4"));
}
