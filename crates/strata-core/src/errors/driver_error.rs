//! Structured error detail reported by the underlying database driver.

/// Failure reported by a [`SqlConnection`](crate::traits::SqlConnection)
/// when a statement does not execute. Renders as `[code] message`, or just
/// `message` when the driver gave no code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.code, .message))]
pub struct DriverError {
    /// Driver-native error code, when the driver exposes one.
    pub code: Option<i32>,
    /// Human-readable driver message.
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }
}

fn render(code: &Option<i32>, message: &str) -> String {
    match code {
        Some(code) => format!("[{code}] {message}"),
        None => message.to_string(),
    }
}
