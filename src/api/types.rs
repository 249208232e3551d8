use crate::session::{FileType, UploadedFile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub original_name: String,
    pub filename: String,
    pub size: u64,
    #[serde(default)]
    pub extension: String,
}

impl From<UploadResponse> for UploadedFile {
    fn from(response: UploadResponse) -> Self {
        UploadedFile {
            file_type: response.file_type,
            server_filename: response.filename,
            size_bytes: response.size,
            extension: response.extension,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ConvertRequest<'a> {
    pub file_path: &'a str,
    pub target_format: &'a str,
    pub quality: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertResponse {
    pub success: bool,
    pub filename: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadAllRequest<'a> {
    pub filenames: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct FfmpegStatus {
    pub installed: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageList {
    pub languages: Vec<String>,
}
