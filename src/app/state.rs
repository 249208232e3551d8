use super::toast::ToastQueue;
use crate::api::UploadResponse;
use crate::error::ApiError;
use crate::session::{BatchProgress, ConversionQueue, EntryId};
use std::path::PathBuf;

/// Results delivered from background tasks to the UI thread.
#[derive(Debug)]
pub enum BackendEvent {
    Uploaded {
        id: EntryId,
        result: Result<UploadResponse, ApiError>,
    },
    Converted {
        id: EntryId,
        result: Result<String, ApiError>,
    },
    Downloaded(Result<PathBuf, ApiError>),
    ZipDownloaded(Result<PathBuf, ApiError>),
    FfmpegChecked(Result<bool, ApiError>),
    LanguagesLoaded(Result<Vec<String>, ApiError>),
    LocaleLoaded {
        language: String,
        result: Result<serde_json::Value, ApiError>,
    },
}

/// Presentation state that is not part of the session itself.
#[derive(Debug, Default)]
pub struct UiState {
    pub queue: Option<ConversionQueue>,
    pub last_progress: BatchProgress,
    pub toasts: ToastQueue,
    pub ffmpeg_missing: bool,
    pub is_zipping: bool,
    pub pending_downloads: usize,
    pub last_download: Option<PathBuf>,
    pub drag_hover: bool,
}

impl UiState {
    pub fn progress(&self) -> BatchProgress {
        self.queue
            .as_ref()
            .map(ConversionQueue::progress)
            .unwrap_or(self.last_progress)
    }

    pub fn is_converting_all(&self) -> bool {
        self.queue.is_some()
    }

    /// Back to the idle drop screen. Toasts and the ffmpeg warning survive.
    pub fn clear_session(&mut self) {
        self.queue = None;
        self.last_progress = BatchProgress::NotStarted;
        self.is_zipping = false;
        self.last_download = None;
    }
}
