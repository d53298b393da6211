// Error type shared by the library modules. Each variant maps to one of the
// failure kinds the CLI reports; every one of them except `Clipboard` ends
// the run with a non-zero exit code.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing, uploading or reporting a transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("{}: No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("error uploading: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to upload ({status}): {body}")]
    UploadFailed { status: StatusCode, body: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, TransferError>;
