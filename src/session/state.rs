use super::formats::FileType;
use crate::error::SessionError;
use derivative::Derivative;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Upload,
    Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Uploading,
    Ready,
    Converting,
    Converted,
    Failed { stage: FailureStage, message: String },
}

impl EntryStatus {
    fn accepts_conversion(&self) -> bool {
        matches!(
            self,
            EntryStatus::Ready
                | EntryStatus::Failed {
                    stage: FailureStage::Conversion,
                    ..
                }
        )
    }
}

/// Metadata the backend returns for a finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_type: FileType,
    pub server_filename: String,
    pub size_bytes: u64,
    pub extension: String,
}

/// What the backend needs to run one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub id: EntryId,
    pub server_filename: String,
    pub target_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: EntryId,
    pub original_name: String,
    pub server_filename: Option<String>,
    pub file_type: Option<FileType>,
    pub size_bytes: u64,
    pub extension: Option<String>,
    pub status: EntryStatus,
    pub selected_format: Option<&'static str>,
    pub result_filename: Option<String>,
    holds_name: bool,
}

impl FileEntry {
    /// Entries whose format selector is live.
    pub fn is_editable(&self) -> bool {
        self.file_type.is_some() && self.status.accepts_conversion()
    }

    pub fn output_formats(&self) -> &'static [&'static str] {
        self.file_type.map(FileType::output_formats).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub uploading: usize,
    pub ready: usize,
    pub converting: usize,
    pub converted: usize,
    pub failed: usize,
}

/// Every tracked file of the current session, keyed by id.
///
/// Ids are allocated in increasing order, so iteration follows insertion.
#[derive(Debug, Derivative)]
#[derivative(Default)]
pub struct SessionState {
    entries: BTreeMap<EntryId, FileEntry>,
    reserved_names: HashSet<String>,
    #[derivative(Default(value = "1"))]
    next_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: &str, size_bytes: u64) -> Result<EntryId, SessionError> {
        if self.reserved_names.contains(name) {
            tracing::warn!("Rejected duplicate file: {}", name);
            return Err(SessionError::DuplicateFile(name.to_string()));
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.reserved_names.insert(name.to_string());
        self.entries.insert(
            id,
            FileEntry {
                id,
                original_name: name.to_string(),
                server_filename: None,
                file_type: None,
                size_bytes,
                extension: None,
                status: EntryStatus::Uploading,
                selected_format: None,
                result_filename: None,
                holds_name: true,
            },
        );
        tracing::debug!("Added {} as {}", name, id);
        Ok(id)
    }

    /// Returns `false` when the entry was removed while the upload was in flight.
    pub fn complete_upload(&mut self, id: EntryId, uploaded: UploadedFile) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            tracing::debug!("Dropping upload result for removed entry {}", id);
            return false;
        };
        if entry.status != EntryStatus::Uploading {
            tracing::warn!("Upload result for {} arrived in state {:?}", id, entry.status);
            return false;
        }

        entry.selected_format = Some(uploaded.file_type.default_format());
        entry.file_type = Some(uploaded.file_type);
        entry.server_filename = Some(uploaded.server_filename);
        entry.size_bytes = uploaded.size_bytes;
        entry.extension = Some(uploaded.extension);
        entry.status = EntryStatus::Ready;
        tracing::debug!("{} ready as {}", id, uploaded.file_type);
        true
    }

    pub fn fail_upload(&mut self, id: EntryId, message: &str) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            tracing::debug!("Dropping upload failure for removed entry {}", id);
            return false;
        };
        if entry.status != EntryStatus::Uploading {
            return false;
        }

        entry.status = EntryStatus::Failed {
            stage: FailureStage::Upload,
            message: message.to_string(),
        };
        if entry.holds_name {
            entry.holds_name = false;
            self.reserved_names.remove(&entry.original_name);
        }
        tracing::warn!("Upload of {} failed: {}", entry.original_name, message);
        true
    }

    pub fn set_selected_format(&mut self, id: EntryId, format: &str) -> Result<(), SessionError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(SessionError::UnknownEntry(id))?;
        let canonical = entry
            .file_type
            .and_then(|t| t.find_format(format))
            .ok_or_else(|| SessionError::InvalidFormat {
                format: format.to_string(),
            })?;
        entry.selected_format = Some(canonical);
        Ok(())
    }

    pub fn start_conversion(&mut self, id: EntryId) -> Result<ConversionJob, SessionError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(SessionError::UnknownEntry(id))?;
        if !entry.status.accepts_conversion() {
            return Err(SessionError::NotReady(id));
        }
        let (Some(server_filename), Some(format)) =
            (entry.server_filename.clone(), entry.selected_format)
        else {
            return Err(SessionError::NotReady(id));
        };

        entry.status = EntryStatus::Converting;
        entry.result_filename = None;
        tracing::debug!("Converting {} to {}", entry.original_name, format);
        Ok(ConversionJob {
            id,
            server_filename,
            target_format: format.to_string(),
        })
    }

    pub fn complete_conversion(&mut self, id: EntryId, result_filename: &str) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.status == EntryStatus::Converting => {
                entry.status = EntryStatus::Converted;
                entry.result_filename = Some(result_filename.to_string());
                tracing::debug!("{} converted to {}", entry.original_name, result_filename);
                true
            }
            Some(_) => false,
            None => {
                tracing::debug!("Dropping conversion result for removed entry {}", id);
                false
            }
        }
    }

    pub fn fail_conversion(&mut self, id: EntryId, message: &str) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.status == EntryStatus::Converting => {
                entry.status = EntryStatus::Failed {
                    stage: FailureStage::Conversion,
                    message: message.to_string(),
                };
                tracing::warn!("Conversion of {} failed: {}", entry.original_name, message);
                true
            }
            _ => false,
        }
    }

    /// Sends a converted entry back to `Ready` so another format can be picked.
    pub fn reconvert(&mut self, id: EntryId) -> Result<(), SessionError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(SessionError::UnknownEntry(id))?;
        if entry.status != EntryStatus::Converted {
            return Err(SessionError::NotReady(id));
        }
        entry.status = EntryStatus::Ready;
        entry.result_filename = None;
        Ok(())
    }

    pub fn remove(&mut self, id: EntryId) -> Option<FileEntry> {
        let entry = self.entries.remove(&id)?;
        if entry.holds_name {
            self.reserved_names.remove(&entry.original_name);
        }
        tracing::debug!("Removed {} ({})", entry.original_name, id);

        if self.entries.is_empty() {
            self.reset();
        }
        Some(entry)
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.reserved_names.clear();
        tracing::debug!("Session reset");
    }

    pub fn get(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.get(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.contains(name)
    }

    pub fn reserved_count(&self) -> usize {
        self.reserved_names.len()
    }

    pub fn converted_count(&self) -> usize {
        self.status_counts().converted
    }

    pub fn converted_filenames(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.status == EntryStatus::Converted)
            .filter_map(|e| e.result_filename.clone())
            .collect()
    }

    /// Entries a "convert all" run would pick up.
    pub fn convertible_ids(&self) -> Vec<EntryId> {
        self.entries
            .values()
            .filter(|e| e.status == EntryStatus::Ready)
            .map(|e| e.id)
            .collect()
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut FileEntry> {
        self.entries.values_mut()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for entry in self.entries.values() {
            match entry.status {
                EntryStatus::Uploading => counts.uploading += 1,
                EntryStatus::Ready => counts.ready += 1,
                EntryStatus::Converting => counts.converting += 1,
                EntryStatus::Converted => counts.converted += 1,
                EntryStatus::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }
}
