use serde::Deserialize;

use crate::error::AgingError;

/// Header names the classifier reads from each row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub business_area: String,
    pub disconnected_date: String,
    pub revisit_date: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            business_area: "Business Area".into(),
            disconnected_date: "Disconnected Date".into(),
            revisit_date: "Latest Revisit Date".into(),
        }
    }
}

impl ColumnMapping {
    pub fn validate(&self) -> Result<(), AgingError> {
        for (field, value) in [
            ("business_area", &self.business_area),
            ("disconnected_date", &self.disconnected_date),
            ("revisit_date", &self.revisit_date),
        ] {
            if value.trim().is_empty() {
                return Err(AgingError::Config(format!("column '{field}' must not be empty")));
            }
        }
        Ok(())
    }

    /// Column used to age rows. Every view ages by disconnection date;
    /// `revisit` only uses the revisit column as a filter.
    pub fn age_column(&self) -> &str {
        &self.disconnected_date
    }
}
