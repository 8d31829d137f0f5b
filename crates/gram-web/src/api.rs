//! Fetch Transport
//!
//! Sends form submissions through `reqwest`, which uses the browser's fetch
//! API on wasm targets.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Url};

use gram_core::{FormRequest, InteractionError, Result, Transport};

/// Transport resolving request URLs against the page they were issued from
#[derive(Clone, Debug)]
pub struct FetchTransport {
    client: reqwest::Client,
    base: Url,
}

impl FetchTransport {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| InteractionError::Url(format!("{base}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Base on the document's base URI, falling back to the window location.
    pub fn for_document(document: &web_sys::Document) -> Result<Self> {
        let base = document
            .base_uri()
            .ok()
            .flatten()
            .or_else(|| web_sys::window().and_then(|w| w.location().href().ok()))
            .ok_or_else(|| InteractionError::Url("page has no base URI".into()))?;
        Self::new(&base)
    }

    /// Absolute URL for a form action or endpoint path; empty means the
    /// current page.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base
            .join(url)
            .map_err(|e| InteractionError::Url(format!("{url}: {e}")))
    }

    /// Request for a submission: fields go in the query string for GET and
    /// HEAD, in a url-encoded body otherwise.
    pub fn build(&self, request: &FormRequest) -> Result<RequestBuilder> {
        let url = self.resolve(&request.url)?;
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| InteractionError::InvalidMethod(request.method.as_str().to_string()))?;

        let builder = self.client.request(method, url);
        let builder = if request.method.sends_body() {
            builder.form(&request.fields)
        } else {
            builder.query(&request.fields)
        };

        Ok(builder
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest"))
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn submit(&self, request: &FormRequest) -> Result<serde_json::Value> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(|e| InteractionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InteractionError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| InteractionError::Decode(e.to_string()))
    }
}
