//! `web-sys` implementations of the page traits

use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use gram_core::{Document, Element};

/// Live element of the page
#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    pub fn as_element(&self) -> &web_sys::Element {
        &self.0
    }
}

impl Element for WebElement {
    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn value(&self) -> Option<String> {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(area) = self.0.dyn_ref::<HtmlTextAreaElement>() {
            Some(area.value())
        } else {
            self.0.dyn_ref::<HtmlSelectElement>().map(HtmlSelectElement::value)
        }
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

/// The live document
#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }

    pub fn as_document(&self) -> &web_sys::Document {
        &self.0
    }
}

fn first(found: Result<Option<web_sys::Element>, wasm_bindgen::JsValue>, selector: &str) -> Option<WebElement> {
    match found {
        Ok(element) => element.map(WebElement),
        Err(e) => {
            tracing::warn!(selector, error = ?e, "Invalid selector");
            None
        }
    }
}

impl Document for WebDocument {
    type Element = WebElement;

    fn query(&self, selector: &str) -> Option<WebElement> {
        first(self.0.query_selector(selector), selector)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let list = match self.0.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(selector, error = ?e, "Invalid selector");
                return Vec::new();
            }
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect()
    }

    fn query_within(&self, root: &WebElement, selector: &str) -> Option<WebElement> {
        first(root.0.query_selector(selector), selector)
    }
}
