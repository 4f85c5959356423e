//! Client error handling

use fhir_core::OperationOutcome;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required input was absent or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The server answered with a non-success status
    #[error(transparent)]
    Server(Box<ServerResponseError>),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures below the FHIR layer, kept apart so callers can tell them apart
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("Failed to parse response from server")]
    Malformed(#[source] serde_json::Error),

    #[error("HTTP request failed")]
    Other(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportError::Connect(err)
        } else if err.is_timeout() {
            TransportError::Timeout(err)
        } else {
            TransportError::Other(err)
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.into())
    }
}

impl From<ServerResponseError> for ClientError {
    fn from(err: ServerResponseError) -> Self {
        ClientError::Server(Box::new(err))
    }
}

/// Error envelope of a non-success FHIR response.
///
/// Every field is optional on its own: a proxy may answer without a body, a
/// body may not be an OperationOutcome, and so on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerResponseError {
    pub status: Option<u16>,
    pub mime_type: Option<String>,
    pub body: Option<String>,
    pub additional_messages: Vec<String>,
    pub outcome: Option<OperationOutcome>,
}

impl std::fmt::Display for ServerResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}", status)?,
            None => write!(f, "HTTP status unknown")?,
        }
        if let Some(reason) = self
            .status
            .and_then(|s| reqwest::StatusCode::from_u16(s).ok())
            .and_then(|s| s.canonical_reason())
        {
            write!(f, " {}", reason)?;
        }
        if let Some(issue) = self.outcome.as_ref().and_then(|o| o.issue.first()) {
            write!(f, ": {}", issue.display_message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerResponseError {}
