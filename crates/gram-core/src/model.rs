//! Wire and Domain Types
//!
//! Shapes exchanged with the subscribe and vote endpoints, plus the
//! transport-neutral request description handed to a [`Transport`].
//!
//! [`Transport`]: crate::transport::Transport

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{InteractionError, Result};

/// Form field carrying the anti-forgery token
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Form field carrying the vote direction
pub const IS_LIKE_FIELD: &str = "is_like";

/// Numeric post identifier used by the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-issued anti-forgery token, read at click time and never stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which control was activated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteDirection {
    Like,
    Dislike,
}

impl VoteDirection {
    /// Wire encoding of `is_like`
    pub fn as_form_value(self) -> &'static str {
        match self {
            VoteDirection::Like => "true",
            VoteDirection::Dislike => "false",
        }
    }

    /// Decode `is_like`; anything but `"true"` counts as a dislike.
    pub fn from_form_value(value: &str) -> Self {
        if value == "true" {
            VoteDirection::Like
        } else {
            VoteDirection::Dislike
        }
    }
}

/// Response of the subscribe endpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    /// Absent reads as not subscribed
    #[serde(default)]
    pub is_subscribed: bool,
}

impl SubscriptionStatus {
    /// Read a response body the way the page script does: the field is
    /// tested for truthiness, and only a `null` body is rejected.
    pub fn from_body(body: &Value) -> Result<Self> {
        if body.is_null() {
            return Err(InteractionError::Decode("empty subscription response".into()));
        }
        Ok(Self {
            is_subscribed: body.get("is_subscribed").is_some_and(truthy),
        })
    }

    pub const SUBSCRIBE: &'static str = "Subscribe";
    pub const UNSUBSCRIBE: &'static str = "Unsubscribe";

    /// Text for the subscribe control: the action the next click performs
    pub fn label(&self) -> &'static str {
        if self.is_subscribed {
            Self::UNSUBSCRIBE
        } else {
            Self::SUBSCRIBE
        }
    }
}

/// Vote endpoint response as shown by the page: the text for each display.
///
/// `None` leaves that display untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub likes_count: Option<String>,
    pub dislikes_count: Option<String>,
}

impl VoteCounts {
    /// Read each count independently; a field of an unexpected type does
    /// not affect the other one. Only a `null` body is rejected.
    pub fn from_body(body: &Value) -> Result<Self> {
        if body.is_null() {
            return Err(InteractionError::Decode("empty vote response".into()));
        }
        Ok(Self {
            likes_count: body.get("likes_count").and_then(display_text),
            dislikes_count: body.get("dislikes_count").and_then(display_text),
        })
    }
}

/// JavaScript truthiness of a JSON value
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text a JSON value renders as on the page; `null` renders nothing.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            // f64 Display prints integral values without a fraction, like JS
            (None, None, Some(f)) => f.to_string(),
            (None, None, None) => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Authoritative tally for one post, as served by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub likes_count: u64,
    pub dislikes_count: u64,
}

impl From<VoteTally> for VoteCounts {
    fn from(tally: VoteTally) -> Self {
        Self {
            likes_count: Some(tally.likes_count.to_string()),
            dislikes_count: Some(tally.dislikes_count.to_string()),
        }
    }
}

/// HTTP method of a form submission
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
    /// Any other method, upper-cased and sent as-is
    Other(String),
}

impl FormMethod {
    /// Parse a form's `method` attribute; missing or blank means GET.
    pub fn parse(method: Option<&str>) -> Self {
        let method = method.map(str::trim).unwrap_or_default();
        if method.is_empty() || method.eq_ignore_ascii_case("get") {
            FormMethod::Get
        } else if method.eq_ignore_ascii_case("post") {
            FormMethod::Post
        } else {
            FormMethod::Other(method.to_ascii_uppercase())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
            FormMethod::Other(method) => method,
        }
    }

    /// GET and HEAD carry their fields in the query string; everything
    /// else in a url-encoded body.
    pub fn sends_body(&self) -> bool {
        !matches!(self.as_str(), "GET" | "HEAD")
    }
}

/// One asynchronous form submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormRequest {
    pub method: FormMethod,
    /// Possibly relative; empty means the current page
    pub url: String,
    /// Url-encoded fields, in insertion order
    pub fields: Vec<(String, String)>,
}

impl FormRequest {
    pub fn new(method: FormMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            fields: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(FormMethod::Post, url)
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append the CSRF field when a token was found; omitted otherwise.
    pub fn csrf(self, token: Option<&CsrfToken>) -> Self {
        match token {
            Some(token) => self.field(CSRF_FIELD, token.as_str()),
            None => self,
        }
    }

    /// Look up the first value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}
