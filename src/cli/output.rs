//! output formatting for scriptable CLI output
//!
//! uses JSON-RPC 2.0 format for machine-readable output:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "...", "data": {...}}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

use crate::collect::CollectedCases;

const JSONRPC_VERSION: &str = "2.0";

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON-RPC 2.0 output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// JSON-RPC 2.0 success response
#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    /// null for CLI responses (no request id)
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 error response
#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

/// JSON-RPC 2.0 error object
#[derive(Serialize)]
pub struct RpcError {
    /// tagsel exit code offset by -32000
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

#[derive(Serialize)]
pub struct ErrorData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self::with_suggestions(code, message, Vec::new())
    }

    pub fn with_suggestions(
        code: i32,
        message: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let data = if suggestions.is_empty() {
            None
        } else {
            Some(ErrorData {
                suggestions: Some(suggestions),
            })
        };

        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
                data,
            },
            id: None,
        }
    }
}

/// JSON-RPC reserves -32000 to -32099 for server/application errors
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures
// ============================================================================

/// result of `select`
#[derive(Debug, Serialize)]
pub struct SelectData {
    /// false when no rules were given and every test is eligible
    pub active: bool,
    pub total: usize,
    pub selected: Vec<String>,
}

/// result of `collect`
#[derive(Debug, Serialize)]
pub struct CollectData<'a> {
    pub tests: &'a CollectedCases,
}

/// result of `check`
#[derive(Debug, Serialize)]
pub struct CheckData {
    pub active: bool,
    /// each group rendered as its comma-joined rules
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ============================================================================
// Output functions
// ============================================================================

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error with optional suggestions to stdout
pub fn print_json_error(code: i32, message: &str, suggestions: Vec<String>) {
    let error = JsonRpcError::with_suggestions(code, message, suggestions);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}
