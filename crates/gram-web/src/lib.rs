//! gram Web Frontend
//!
//! WASM entry point: once the DOM is ready, binds the subscribe toggle and
//! the like/dislike controls of the server-rendered page.

mod api;
mod bind;
mod dom;
mod logging;

pub use api::FetchTransport;
pub use dom::{WebDocument, WebElement};

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use gram_core::{InteractionConfig, SubscriptionToggle, VoteHandler};

/// Attribute on `<body>` holding JSON overrides of the page contract
const CONFIG_ATTRIBUTE: &str = "data-gram-config";

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::error!("No document to bind to");
        return;
    };

    if is_loading(&document.ready_state()) {
        let ready = document.clone();
        let callback = Closure::once_into_js(move || install(&ready));
        if let Err(e) =
            document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            tracing::error!(error = ?e, "Could not wait for DOMContentLoaded");
        }
    } else {
        install(&document);
    }
}

/// `document.readyState` is one of "loading", "interactive" or "complete".
fn is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn read_config(document: &web_sys::Document) -> InteractionConfig {
    let Some(json) = document.body().and_then(|b| b.get_attribute(CONFIG_ATTRIBUTE)) else {
        return InteractionConfig::default();
    };

    InteractionConfig::from_json(&json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring invalid {CONFIG_ATTRIBUTE}");
        InteractionConfig::default()
    })
}

/// Register both handlers against the current document
fn install(document: &web_sys::Document) {
    let config = read_config(document);
    let transport = match FetchTransport::for_document(document) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "Handlers not registered");
            return;
        }
    };

    let page = WebDocument::new(document.clone());
    let subscribe = Rc::new(SubscriptionToggle::new(
        page.clone(),
        transport.clone(),
        config.clone(),
    ));
    let votes = Rc::new(VoteHandler::new(page.clone(), transport, config));

    let subscribe_controls = bind::bind_subscribe(&page, subscribe);
    let vote_controls = bind::bind_votes(&page, votes);
    tracing::info!(subscribe_controls, vote_controls, "Interaction handlers registered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_only_while_loading() {
        assert!(is_loading("loading"));
        assert!(!is_loading("interactive"));
        assert!(!is_loading("complete"));
    }
}
