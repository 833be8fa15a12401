use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    /// Nothing to read at the given path.
    #[error("no file uploaded: {0} does not exist")]
    NotFound(PathBuf),
    /// Extension not on the allow-list.
    #[error("invalid file type '{extension}'; allowed: {}", allowed.join(", "))]
    UnsupportedType { extension: String, allowed: Vec<String> },
    /// File exceeds the configured size limit.
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

impl IoError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NO_FILE",
            Self::UnsupportedType { .. } => "INVALID_FILE_TYPE",
            Self::TooLarge { .. } => "FILE_TOO_LARGE",
            Self::Open { .. } | Self::NoSheets | Self::Sheet { .. } | Self::Csv(_) => "READ_FAILED",
        }
    }

    /// Rejected before reading (bad upload) rather than failed while reading.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::UnsupportedType { .. } | Self::TooLarge { .. })
    }
}
