//! Page Abstraction
//!
//! The handlers see the page only through these traits. The browser crate
//! implements them over `web-sys`; tests use [`crate::mock::MemoryDocument`].

/// Handle to one element of the page
pub trait Element {
    /// Whether the element's class list contains `class`
    fn has_class(&self, class: &str) -> bool;

    /// Attribute value, `None` when absent
    fn attribute(&self, name: &str) -> Option<String>;

    /// Current value of a form control, `None` for non-controls
    fn value(&self) -> Option<String>;

    /// Text content
    fn text(&self) -> String;

    /// Replace the text content
    fn set_text(&self, text: &str);
}

/// The page's document
pub trait Document {
    type Element: Element;

    /// First element matching `selector`
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// First descendant of `root` matching `selector`
    fn query_within(&self, root: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Set the text of every element matching `selector`; returns how many
    /// were updated.
    fn set_text_all(&self, selector: &str, text: &str) -> usize {
        let elements = self.query_all(selector);
        for element in &elements {
            element.set_text(text);
        }
        elements.len()
    }
}

/// How a handler is attached to its controls
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickBinding {
    /// Controls receiving the click listener
    pub selector: String,

    /// Whether the click's default action is cancelled
    pub prevent_default: bool,
}
