//! Client-side error taxonomy for the load harness.
//!
//! Every failure the transport, codec or dispatcher can produce collapses
//! into [`ClientError`]. Local failures carry a stable numeric code;
//! server-declared business errors carry the code the ledger itself
//! returned inside its `errorInformation` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One observable error shape for the whole harness.
///
/// Code space (stable, do not renumber): illegal-state=1, io=2,
/// no-result=3, field-validation=4, json-parsing=5, cryptography=6,
/// connect=7. `ServerDeclared` carries the server's own code instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    IllegalState(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    NoResult(String),

    #[error("{0}")]
    FieldValidate(String),

    #[error("{0}")]
    JsonParsing(String),

    #[error("{0}")]
    Cryptography(String),

    #[error("{0}")]
    Connect(String),

    /// A business error the ledger declared in its response body.
    #[error("{message}")]
    ServerDeclared { code: i64, message: String },
}

impl ClientError {
    /// Normalized numeric cause, suffixed onto failed outcome codes.
    pub fn code(&self) -> i64 {
        match self {
            ClientError::IllegalState(_) => 1,
            ClientError::Io(_) => 2,
            ClientError::NoResult(_) => 3,
            ClientError::FieldValidate(_) => 4,
            ClientError::JsonParsing(_) => 5,
            ClientError::Cryptography(_) => 6,
            ClientError::Connect(_) => 7,
            ClientError::ServerDeclared { code, .. } => *code,
        }
    }
}

/// Error envelope the central-ledger embeds in otherwise-2xx bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInformation {
    pub error_code: String,
    pub error_description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error_information: Option<ErrorInformation>,
}

impl ErrorEnvelope {
    /// Scans a decoded JSON object for a declared business error.
    ///
    /// Only a parseable, strictly positive `errorCode` counts as an error;
    /// any other shape is a normal payload.
    pub fn declared_error(value: &Value) -> Option<ClientError> {
        if !value.is_object() {
            return None;
        }
        let envelope: ErrorEnvelope = serde_json::from_value(value.clone()).ok()?;
        let info = envelope.error_information?;
        let code: i64 = info.error_code.trim().parse().ok()?;
        if code > 0 {
            Some(ClientError::ServerDeclared {
                code,
                message: info.error_description,
            })
        } else {
            None
        }
    }
}
