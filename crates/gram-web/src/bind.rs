//! Click Wiring
//!
//! Attaches one listener per control present when the page became ready.
//! Each click spawns an independent request; nothing guards against a
//! second click while the first is in flight.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use gram_core::{ClickBinding, Document, SubscriptionToggle, VoteHandler};

use crate::api::FetchTransport;
use crate::dom::{WebDocument, WebElement};

pub type Subscribe = SubscriptionToggle<WebDocument, FetchTransport>;
pub type Vote = VoteHandler<WebDocument, FetchTransport>;

/// Bind `on_click` to every control matching the binding; returns how many
/// listeners were attached.
fn listen<F>(page: &WebDocument, binding: &ClickBinding, on_click: F) -> usize
where
    F: Fn(WebElement) + Clone + 'static,
{
    let mut bound = 0;
    for control in page.query_all(&binding.selector) {
        let prevent_default = binding.prevent_default;
        let on_click = on_click.clone();
        let target = control.clone();

        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if prevent_default {
                event.prevent_default();
            }
            on_click(target.clone());
        });

        match control
            .as_element()
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        {
            Ok(()) => {
                // The listener lives as long as the page.
                listener.forget();
                bound += 1;
            }
            Err(e) => tracing::warn!(selector = %binding.selector, error = ?e, "Could not bind click listener"),
        }
    }
    bound
}

pub fn bind_subscribe(page: &WebDocument, handler: Rc<Subscribe>) -> usize {
    let binding = handler.config().subscribe_binding();
    listen(page, &binding, move |_control| {
        let handler = Rc::clone(&handler);
        spawn_local(async move { handler.activate().await });
    })
}

pub fn bind_votes(page: &WebDocument, handler: Rc<Vote>) -> usize {
    let binding = handler.config().vote_binding();
    listen(page, &binding, move |control| {
        let handler = Rc::clone(&handler);
        spawn_local(async move { handler.activate(&control).await });
    })
}
