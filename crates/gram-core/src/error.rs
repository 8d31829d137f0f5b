//! Error Types

use thiserror::Error;

/// Result type alias for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;

/// Everything that can stop a click from reaching the page.
///
/// The handlers treat all variants alike (one error event, no visible
/// change); the split exists for diagnostics.
#[derive(Error, Debug)]
pub enum InteractionError {
    /// Request could not be completed (offline, CORS, aborted)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("Request failed with status {0}")]
    Status(u16),

    /// Body was not the JSON the handler expected
    #[error("Malformed response: {0}")]
    Decode(String),

    /// A required element is missing from the page
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// A control lacks an attribute the handler needs
    #[error("Element {selector} has no {attribute} attribute")]
    MissingAttribute { selector: String, attribute: String },

    /// Form declares a method that is not a valid HTTP method token
    #[error("Invalid request method: {0:?}")]
    InvalidMethod(String),

    /// Request URL could not be resolved against the page
    #[error("Invalid request URL: {0}")]
    Url(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InteractionError {
    /// True when the request itself failed, as opposed to the page not
    /// matching the expected markup.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            InteractionError::Network(_)
                | InteractionError::Status(_)
                | InteractionError::Decode(_)
                | InteractionError::Json(_)
        )
    }
}
