//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                         |
//! |------|-----------|-----------------------------------------------------|
//! | 0    | Universal | Success                                             |
//! | 1    | Universal | General error (internal failure)                    |
//! | 2    | Universal | CLI usage error (bad args, bad settings file)       |
//! | 3    | dataset   | No dataset loaded                                   |
//! | 4    | view      | Unknown view, or records asked of aggregate-only    |
//! | 5    | input     | Upload rejected (missing, wrong type, too large)    |
//! | 6    | input     | File accepted but could not be read                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the mapping functions below

use agingboard_aging::AgingError;
use agingboard_io::IoError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - internal failure, output could not be written.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or invalid settings.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Aging (3-6)
// =============================================================================

/// A computation was requested with no current dataset.
pub const EXIT_NO_DATASET: u8 = 3;

/// View token not recognized, or records requested for `belumrevisit`.
pub const EXIT_INVALID_VIEW: u8 = 4;

/// Input file rejected before reading: missing, extension not allowed, too large.
pub const EXIT_INPUT_REJECTED: u8 = 5;

/// Input file accepted but extraction failed.
pub const EXIT_READ_FAILED: u8 = 6;

// =============================================================================
// Mapping
// =============================================================================

pub fn aging_exit_code(err: &AgingError) -> u8 {
    match err {
        AgingError::NoDatasetLoaded => EXIT_NO_DATASET,
        AgingError::InvalidView(_) | AgingError::AggregateOnlyView(_) => EXIT_INVALID_VIEW,
        AgingError::Config(_) => EXIT_USAGE,
        AgingError::Internal(_) => EXIT_ERROR,
    }
}

pub fn io_exit_code(err: &IoError) -> u8 {
    if err.is_rejection() {
        EXIT_INPUT_REJECTED
    } else {
        EXIT_READ_FAILED
    }
}
