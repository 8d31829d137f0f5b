//! Interaction Configuration
//!
//! The page contract the handlers rely on. Every field has a default that
//! matches the server-rendered templates, so an empty JSON object is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::dom::ClickBinding;
use crate::error::Result;

/// Selectors, class names and paths used by both handlers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Control(s) toggling the subscription
    pub subscribe_button: String,

    /// Form declaring the subscribe endpoint's action and method
    pub subscribe_form: String,

    /// Hidden input holding the CSRF token
    pub csrf_input: String,

    /// Class marking a like control
    pub like_class: String,

    /// Class marking a dislike control
    pub dislike_class: String,

    /// Attribute on vote controls naming the target post
    pub post_id_attribute: String,

    /// Id prefix of the likes display; the post id is appended
    pub likes_count_prefix: String,

    /// Id prefix of the dislikes display; the post id is appended
    pub dislikes_count_prefix: String,

    /// Path prefix of the vote endpoint
    pub vote_path_prefix: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            subscribe_button: ".subscribe-button".into(),
            subscribe_form: "#subscribe-form".into(),
            csrf_input: "input[name=csrfmiddlewaretoken]".into(),
            like_class: "like-button".into(),
            dislike_class: "dislike-button".into(),
            post_id_attribute: "data-post-id".into(),
            likes_count_prefix: "likes-count-".into(),
            dislikes_count_prefix: "dislikes-count-".into(),
            vote_path_prefix: "/main_app".into(),
        }
    }
}

impl InteractionConfig {
    /// Parse overrides; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Vote endpoint for a post; `post_id` is the attribute text as written
    pub fn vote_url(&self, post_id: &str) -> String {
        format!(
            "{}/{}/like-dislike/",
            self.vote_path_prefix.trim_end_matches('/'),
            post_id
        )
    }

    pub fn likes_count_selector(&self, post_id: &str) -> String {
        format!("#{}{}", self.likes_count_prefix, post_id)
    }

    pub fn dislikes_count_selector(&self, post_id: &str) -> String {
        format!("#{}{}", self.dislikes_count_prefix, post_id)
    }

    /// The subscribe control suppresses its default navigation
    pub fn subscribe_binding(&self) -> ClickBinding {
        ClickBinding {
            selector: self.subscribe_button.clone(),
            prevent_default: true,
        }
    }

    /// Like and dislike controls share one binding
    pub fn vote_binding(&self) -> ClickBinding {
        ClickBinding {
            selector: format!(".{}, .{}", self.like_class, self.dislike_class),
            prevent_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_contract() {
        let config = InteractionConfig::default();
        assert_eq!(config.vote_url("42"), "/main_app/42/like-dislike/");
        assert_eq!(config.likes_count_selector("42"), "#likes-count-42");
        assert_eq!(config.dislikes_count_selector("42"), "#dislikes-count-42");
    }

    #[test]
    fn test_bindings() {
        let config = InteractionConfig::default();

        let subscribe = config.subscribe_binding();
        assert_eq!(subscribe.selector, ".subscribe-button");
        assert!(subscribe.prevent_default);

        let vote = config.vote_binding();
        assert_eq!(vote.selector, ".like-button, .dislike-button");
        assert!(!vote.prevent_default);
    }

    #[test]
    fn test_partial_override() {
        let config = InteractionConfig::from_json(r#"{"vote_path_prefix": "/app/"}"#).unwrap();
        assert_eq!(config.vote_url("7"), "/app/7/like-dislike/");
        assert_eq!(config.subscribe_form, "#subscribe-form");
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        assert!(InteractionConfig::from_json("not json").is_err());
    }
}
