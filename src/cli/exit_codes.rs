//! exit codes for tagsel commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error (unreadable catalog, I/O)
pub const ERROR: i32 = 1;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// a rule source or expression failed to compile
pub const INVALID_RULES: i32 = 8;

/// an expression failed while evaluating a test
pub const EVAL_ERROR: i32 = 9;
