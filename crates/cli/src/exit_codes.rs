//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract; site maintenance scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Description                                          |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage / config error (bad args, invalid config file) |
//! | 3    | Expected input absent (catalog JSON or image dir)    |
//! | 4    | Report write failure                                 |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, invalid audit config.
pub const EXIT_USAGE: u8 = 2;

/// An expected input path is absent (catalog JSON file or image
/// directory). The run aborts gracefully with a message, never a crash.
pub const EXIT_INPUT_MISSING: u8 = 3;

/// A report file could not be written.
pub const EXIT_WRITE: u8 = 4;
