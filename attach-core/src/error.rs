use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttachError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Failures while reading a user-selected file, before anything is persisted.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Not a PDF file: {0}")]
    NotPdf(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("Unreadable file: {0}")]
    Unreadable(String),
}

pub type Result<T> = std::result::Result<T, AttachError>;
