//! Subscription Toggle
//!
//! Submits the subscribe form in the background and relabels the
//! subscribe control from the server's answer.

use crate::config::InteractionConfig;
use crate::dom::{Document, Element};
use crate::error::{InteractionError, Result};
use crate::model::{CsrfToken, FormMethod, FormRequest, SubscriptionStatus};
use crate::transport::Transport;

/// Handler behind the subscribe control
pub struct SubscriptionToggle<D, T> {
    document: D,
    transport: T,
    config: InteractionConfig,
}

impl<D, T> SubscriptionToggle<D, T>
where
    D: Document,
    T: Transport,
{
    pub fn new(document: D, transport: T, config: InteractionConfig) -> Self {
        Self {
            document,
            transport,
            config,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Click entry point. Failures are logged and leave the label as it was.
    pub async fn activate(&self) {
        if let Err(e) = self.toggle().await {
            tracing::error!(error = %e, "Subscribe request failed");
        }
    }

    /// Build the request from the form as it is right now.
    pub fn request(&self) -> Result<FormRequest> {
        let form = self
            .document
            .query(&self.config.subscribe_form)
            .ok_or_else(|| InteractionError::MissingElement(self.config.subscribe_form.clone()))?;

        let action = form.attribute("action").unwrap_or_default();
        let method = FormMethod::parse(form.attribute("method").as_deref());
        let token = self
            .document
            .query_within(&form, &self.config.csrf_input)
            .and_then(|input| input.value())
            .map(CsrfToken::new);

        if token.is_none() {
            tracing::warn!("Subscribe form has no CSRF token");
        }

        Ok(FormRequest::new(method, action).csrf(token.as_ref()))
    }

    /// Submit the form and apply the returned state.
    pub async fn toggle(&self) -> Result<SubscriptionStatus> {
        let request = self.request()?;
        tracing::debug!(method = request.method.as_str(), url = %request.url, "Submitting subscribe form");

        let body = self.transport.submit(&request).await?;
        let status = SubscriptionStatus::from_body(&body)?;

        let updated = self
            .document
            .set_text_all(&self.config.subscribe_button, status.label());
        tracing::debug!(is_subscribed = status.is_subscribed, updated, "Subscription state applied");

        Ok(status)
    }
}
