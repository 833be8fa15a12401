// Spreadsheet row extraction
//
// Turns an uploaded file into header-keyed rows for the aging engine.
// Only the first sheet is read; the first row holds the headers.

pub mod csv;
pub mod error;
pub mod upload;
pub mod xlsx;

use std::path::Path;

use agingboard_aging::RawRow;

pub use error::IoError;
pub use upload::UploadPolicy;

/// Rows extracted from one file.
#[derive(Debug, Clone)]
pub struct ExtractedSheet {
    /// Sheet name for workbooks, file stem for CSV
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Validate `path` against `policy`, then extract rows by extension.
pub fn load_rows(path: &Path, policy: &UploadPolicy) -> Result<ExtractedSheet, IoError> {
    let kind = policy.check(path)?;
    let sheet = match kind {
        upload::FileKind::Csv => csv::read_rows(path)?,
        upload::FileKind::Workbook => xlsx::read_first_sheet(path)?,
    };
    tracing::info!(
        path = %path.display(),
        sheet = %sheet.sheet,
        rows = sheet.rows.len(),
        columns = sheet.headers.len(),
        "extracted rows"
    );
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_csv_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Accounts.CSV");
        std::fs::write(&path, "Business Area,Disconnected Date\nNorth,01.01.2024\n").unwrap();

        let sheet = load_rows(&path, &UploadPolicy::default()).unwrap();
        assert_eq!(sheet.sheet, "Accounts");
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn policy_runs_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        std::fs::write(&path, "Business Area\nNorth\n").unwrap();

        let policy = UploadPolicy {
            allowed_extensions: vec!["xlsx".into()],
            ..UploadPolicy::default()
        };
        let err = load_rows(&path, &policy).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILE_TYPE");
    }
}
