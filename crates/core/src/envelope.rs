// Structured error envelopes returned in place of a tool result

use serde::{Deserialize, Serialize};
use std::backtrace::BacktraceStatus;

/// Remediation hint attached to every envelope
pub const DEFAULT_SUGGESTION: &str =
    "Check the input parameters and network connectivity, then try again.";

/// Error returned by a tool operation in place of its normal result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: bool,
    /// Name of the operation that failed
    pub function: String,
    pub message: String,
    pub stack_trace: String,
    /// Arguments the failing operation was called with
    pub inputs: serde_json::Value,
    pub suggestion: String,
}

impl ErrorEnvelope {
    /// Build an envelope for `error` raised by `function`.
    ///
    /// Logs the failure at error level and the full trace at debug level.
    pub fn from_error(error: &anyhow::Error, function: &str, inputs: serde_json::Value) -> Self {
        let message = error.to_string();
        let stack_trace = render_trace(error);

        tracing::error!(function = %function, "Error in {}: {}", function, message);
        tracing::debug!(function = %function, "Stack trace:\n{}", stack_trace);

        Self {
            error: true,
            function: function.to_string(),
            message,
            stack_trace,
            inputs,
            suggestion: DEFAULT_SUGGESTION.to_string(),
        }
    }
}

fn render_trace(error: &anyhow::Error) -> String {
    let mut trace = format!("Error: {}\n", error);

    for (depth, cause) in error.chain().skip(1).enumerate() {
        trace.push_str(&format!("  {}: caused by: {}\n", depth, cause));
    }

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        trace.push_str("\nBacktrace:\n");
        trace.push_str(&backtrace.to_string());
    }

    trace
}
