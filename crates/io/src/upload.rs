// Upload gate: existence, extension allow-list, size limit

use std::path::Path;

use crate::error::IoError;

/// 100 MB
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Workbook,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    /// Lowercase extensions without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_extensions: vec!["xlsx".into(), "xls".into(), "csv".into()],
        }
    }
}

impl UploadPolicy {
    /// Check `path` before reading it and report how to read it.
    pub fn check(&self, path: &Path) -> Result<FileKind, IoError> {
        let meta = std::fs::metadata(path).map_err(|_| IoError::NotFound(path.to_path_buf()))?;
        if !meta.is_file() {
            return Err(IoError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let allowed = self
            .allowed_extensions
            .iter()
            .any(|a| a.eq_ignore_ascii_case(&extension));
        let kind = file_kind(&extension);
        let (true, Some(kind)) = (allowed, kind) else {
            return Err(IoError::UnsupportedType {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        };

        if meta.len() > self.max_bytes {
            return Err(IoError::TooLarge {
                size: meta.len(),
                limit: self.max_bytes,
            });
        }

        Ok(kind)
    }
}

fn file_kind(extension: &str) -> Option<FileKind> {
    if extension == "csv" {
        Some(FileKind::Csv)
    } else if WORKBOOK_EXTENSIONS.contains(&extension) {
        Some(FileKind::Workbook)
    } else {
        None
    }
}
