//! command error type

use crate::conditions::EvalError;
use crate::rules::CompileError;

use super::exit_codes;

/// error returned by command execution
#[derive(Debug, Clone)]
pub struct CliError {
    /// exit code (maps to JSON-RPC error code via -32000 - code)
    pub code: i32,
    pub message: String,
    /// suggested alternatives (e.g., similar attribute names)
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            suggestions,
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(exit_codes::ERROR, message)
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(exit_codes::INVALID_ARGS, message)
    }

    /// keeps the whole anyhow context chain in the message
    pub fn config(error: anyhow::Error) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, format!("{:#}", error))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::general(format!("{:#}", e))
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        CliError::new(exit_codes::INVALID_RULES, e.to_string())
    }
}

impl From<EvalError> for CliError {
    fn from(e: EvalError) -> Self {
        CliError::new(exit_codes::EVAL_ERROR, e.to_string())
    }
}
