//! CLI Exit Code Registry
//!
//! Single source of truth for `expedicao` exit codes. Scripts that drive the
//! daily batch rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (HTTP client could not be built, ...)   |
//! | 2    | Usage error (bad arguments, bad `--date`)             |
//! | 3    | Input file missing or unreadable                      |
//! | 4    | Input validation failed (missing column, empty field) |
//! | 5    | Output could not be written                           |
//!
//! Per-row lookup failures are not errors: they appear in the result table.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments. Also what clap exits with.
pub const EXIT_USAGE: u8 = 2;

/// Input file missing, unreadable, or not parseable as `;`-separated text.
pub const EXIT_INPUT_UNREADABLE: u8 = 3;

/// A required column is missing or a required field is empty.
/// Nothing is written.
pub const EXIT_INPUT_INVALID: u8 = 4;

/// Output directory or file could not be written.
pub const EXIT_OUTPUT: u8 = 5;
