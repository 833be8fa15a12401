use thiserror::Error;

use crate::view::View;

/// Errors surfaced to callers of the aging engine.
///
/// Per-row problems never show up here: malformed rows are dropped by the
/// classifier and only counted (see [`crate::classify::Discard`]).
#[derive(Debug, Error)]
pub enum AgingError {
    /// No dataset has been loaded, or the current one expired.
    #[error("no data available: load a spreadsheet first")]
    NoDatasetLoaded,
    /// View token is not one of `disconnected`, `revisit`, `belumrevisit`.
    #[error("invalid view '{0}' (expected disconnected, revisit or belumrevisit)")]
    InvalidView(String),
    /// View only exists as an aggregate and has no per-record form.
    #[error("view '{0}' is aggregate-only and has no classified records")]
    AggregateOnlyView(View),
    /// Column mapping or other configuration is unusable.
    #[error("config error: {0}")]
    Config(String),
    /// Anything the engine did not anticipate.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgingError {
    /// Machine-readable code, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDatasetLoaded => "NO_DATASET",
            Self::InvalidView(_) => "INVALID_VIEW",
            Self::AggregateOnlyView(_) => "AGGREGATE_ONLY_VIEW",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the caller supplied bad input, false for internal failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}
