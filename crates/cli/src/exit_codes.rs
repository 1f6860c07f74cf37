//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 60-69   | scrub            | Config, input, IO and export failures    |

use scrubgrid_engine::ScrubError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Scrub (60-69)
// =============================================================================

/// Blacklist locator missing/placeholder, blacklist without usable columns,
/// or config file that fails validation.
pub const EXIT_SCRUB_CONFIG: u8 = 60;

/// Input table is missing the company and/or email column.
pub const EXIT_SCRUB_INPUT: u8 = 61;

/// Input unreadable or blacklist fetch failed.
pub const EXIT_SCRUB_IO: u8 = 62;

/// Writing the exported working set failed.
pub const EXIT_SCRUB_EXPORT: u8 = 63;

/// Map an engine error to its exit code.
pub fn scrub_exit_code(err: &ScrubError) -> u8 {
    match err {
        ScrubError::Config(_) => EXIT_SCRUB_CONFIG,
        ScrubError::InputValidation { .. } => EXIT_SCRUB_INPUT,
        ScrubError::Io(_) => EXIT_SCRUB_IO,
        ScrubError::Export(_) => EXIT_SCRUB_EXPORT,
    }
}
