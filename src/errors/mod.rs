//! Error handling module for the clinic client.
//!
//! Provides centralized error types with a user-facing message policy: server
//! rejections are shown verbatim, transport failures get generic retry
//! guidance, and 401s force a logout.

use crate::models::AppointmentConflict;

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const GRAPHQL_ERROR: &str = "GRAPHQL_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Session missing, token rejected, or a 401 observed on the wire
    Unauthorized(String),
    /// Client-side field rule violation
    Validation(String),
    /// Detected scheduling overlap; blocks submission
    Conflict(Vec<AppointmentConflict>),
    /// Server-rejected operation (GraphQL errors array)
    GraphQl(String),
    /// Transport/connectivity failure
    Network(String),
    /// Malformed response or programming error
    Internal(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Conflict(_) => codes::CONFLICT,
            ClientError::GraphQl(_) => codes::GRAPHQL_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// The message shown to the user.
    ///
    /// GraphQL rejections carry the server's wording verbatim; network
    /// failures never leak transport details.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Conflict(conflicts) => format!(
                "Cannot save appointment due to {} scheduling conflict(s)",
                conflicts.len()
            ),
            ClientError::GraphQl(msg) => msg.clone(),
            ClientError::Network(_) => "Network error. Please check your connection.".to_string(),
            ClientError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Get the raw error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Conflict(conflicts) => {
                format!("{} conflicting appointment(s)", conflicts.len())
            }
            ClientError::GraphQl(msg) => msg.clone(),
            ClientError::Network(msg) => msg.clone(),
            ClientError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Transport error: {:?}", err);
        ClientError::Network(format!("Request failed: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Internal(format!("Malformed response: {}", err))
    }
}
