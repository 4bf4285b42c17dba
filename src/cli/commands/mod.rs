//! CLI command implementations
//!
//! Each command returns its process exit code: 0 on success, 2 for
//! configuration errors, 4 for connection errors, 5 for anything fatal.

pub mod serve;
pub mod status;
pub mod validate;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_CONNECTION: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
