use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse file category assigned by the backend on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Data,
    Pdf,
    Docx,
    Pptx,
    Archive,
    #[serde(other)]
    Other,
}

const IMAGE_FORMATS: &[&str] = &[
    "webp", "png", "jpg", "jpeg", "gif", "bmp", "tiff", "ico", "avif", "pdf",
];
const VIDEO_FORMATS: &[&str] = &[
    "mp4", "webm", "avi", "mkv", "mov", "wmv", "flv", "m4v", "3gp", "mpeg", "mp3", "wav", "gif",
];
const AUDIO_FORMATS: &[&str] = &[
    "mp3", "wav", "aac", "ogg", "flac", "m4a", "wma", "aiff", "opus", "ac3", "m4r",
];
const DATA_FORMATS: &[&str] = &["csv", "xlsx", "json", "txt", "xml", "html"];
const PDF_FORMATS: &[&str] = &["txt", "docx", "doc", "html", "md", "rtf"];
const DOCX_FORMATS: &[&str] = &["pdf", "txt", "html", "md"];
const PPTX_FORMATS: &[&str] = &["pdf", "png", "jpg", "jpeg", "txt"];
const ARCHIVE_FORMATS: &[&str] = &["zip", "7z", "tar"];
const OTHER_FORMATS: &[&str] = &["txt"];

impl FileType {
    /// Table order. Batch results are presented in this order.
    pub const ALL: [FileType; 9] = [
        FileType::Image,
        FileType::Video,
        FileType::Audio,
        FileType::Data,
        FileType::Pdf,
        FileType::Docx,
        FileType::Pptx,
        FileType::Archive,
        FileType::Other,
    ];

    pub fn output_formats(self) -> &'static [&'static str] {
        match self {
            FileType::Image => IMAGE_FORMATS,
            FileType::Video => VIDEO_FORMATS,
            FileType::Audio => AUDIO_FORMATS,
            FileType::Data => DATA_FORMATS,
            FileType::Pdf => PDF_FORMATS,
            FileType::Docx => DOCX_FORMATS,
            FileType::Pptx => PPTX_FORMATS,
            FileType::Archive => ARCHIVE_FORMATS,
            FileType::Other => OTHER_FORMATS,
        }
    }

    pub fn default_format(self) -> &'static str {
        self.output_formats()[0]
    }

    /// Case-insensitive lookup, returning the canonical table entry.
    pub fn find_format(self, format: &str) -> Option<&'static str> {
        self.output_formats()
            .iter()
            .copied()
            .find(|f| f.eq_ignore_ascii_case(format.trim()))
    }

    pub fn supports(self, format: &str) -> bool {
        self.find_format(format).is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Data => "data",
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Pptx => "pptx",
            FileType::Archive => "archive",
            FileType::Other => "other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileType::Image => "🖼",
            FileType::Video => "🎬",
            FileType::Audio => "🎵",
            FileType::Data => "📊",
            FileType::Pdf => "📕",
            FileType::Docx | FileType::Pptx => "📄",
            FileType::Archive => "📦",
            FileType::Other => "📁",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
