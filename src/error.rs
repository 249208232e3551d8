use crate::session::EntryId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("\"{0}\" is already in the session")]
    DuplicateFile(String),
    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),
    #[error("format '{format}' is not offered for this file")]
    InvalidFormat { format: String },
    #[error("entry {0} is not ready for conversion")]
    NotReady(EntryId),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("{0}")]
    Backend(String),
    #[error("could not create zip (status {0})")]
    ZipCreation(u16),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}
