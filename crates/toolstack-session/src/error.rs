//! Session errors and the boolean+message result shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolstack_core::RemoteError;

/// Orchestration error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The service could not be reached or offered nothing to connect to.
    #[error("{0}")]
    Connection(String),
    /// A remote registration, unregistration or turn call failed.
    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),
    /// A plugin mutation was attempted without a live connection.
    #[error("Not connected to the model service")]
    NotConnected,
    /// A local registry entry was rejected.
    #[error("Registration failed: {0}")]
    Registration(String),
}

/// Result of an operation as reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Success message or failure cause.
    pub message: String,
}

impl Outcome {
    /// Successful outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    /// Failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl From<Result<String, SessionError>> for Outcome {
    fn from(result: Result<String, SessionError>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
