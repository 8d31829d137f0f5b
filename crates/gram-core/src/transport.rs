//! Transport Strategy
//!
//! The handlers issue requests only through [`Transport`], so the same
//! logic runs against the browser's fetch API or an in-memory double.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::FormRequest;

/// Sends one form submission and yields the decoded JSON body.
///
/// Browser futures are not `Send`, hence `?Send`.
#[async_trait(?Send)]
pub trait Transport {
    /// Submit the request.
    ///
    /// Network failures, non-success statuses and non-JSON bodies are all
    /// errors; no retry is attempted.
    async fn submit(&self, request: &FormRequest) -> Result<serde_json::Value>;
}
