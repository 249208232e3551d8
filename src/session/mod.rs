mod batch;
mod formats;
mod queue;
mod state;

pub use batch::{apply_batch_format, batch_formats};
pub use formats::FileType;
pub use queue::{BatchProgress, ConversionQueue};
pub use state::{
    ConversionJob, EntryId, EntryStatus, FailureStage, FileEntry, SessionState, StatusCounts,
    UploadedFile,
};
