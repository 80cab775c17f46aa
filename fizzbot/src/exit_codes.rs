//! Stable exit codes for fizzbot CLI commands.

/// Command succeeded (or the interview completed).
pub const OK: i32 = 0;
/// Transport, decode, persistence or configuration failure.
pub const FAILED: i32 = 1;
/// The remote service does not know the requested stage.
pub const NOT_FOUND: i32 = 2;
/// The remote service rejected the submitted answer.
pub const REJECTED: i32 = 3;
/// The remote service replied with an outcome outside the known set.
pub const UNEXPECTED_OUTCOME: i32 = 4;
