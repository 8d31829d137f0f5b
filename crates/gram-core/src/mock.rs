//! In-Memory Page and Transport
//!
//! For tests and demos. [`MemoryDocument`] understands the selector subset
//! the handlers use: tag names, `#id`, `.class`, `[attr=value]`, compounds
//! of those, and comma-separated lists.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::dom::{Document, Element};
use crate::error::{InteractionError, Result};
use crate::model::FormRequest;
use crate::transport::Transport;

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<usize>,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    text: String,
}

impl Node {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Builder for an element added to a [`MemoryDocument`]
#[derive(Debug, Clone)]
pub struct MemoryNode(Node);

impl MemoryNode {
    pub fn new(tag: &str) -> Self {
        Self(Node {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            attributes: Vec::new(),
            value: None,
            text: String::new(),
        })
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.0.attributes.retain(|(k, _)| k != name);
        self.0.attributes.push((name.into(), value.into()));
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class, keeping existing ones
    pub fn class(self, class: &str) -> Self {
        let classes = match self.0.attribute("class") {
            Some(existing) => format!("{existing} {class}"),
            None => class.to_string(),
        };
        self.attr("class", &classes)
    }

    pub fn value(mut self, value: &str) -> Self {
        self.0.value = Some(value.into());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.0.text = text.into();
        self
    }
}

/// A flat, shared element tree
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Rc<RefCell<Vec<Node>>>,
}

/// Handle into a [`MemoryDocument`]
#[derive(Debug, Clone)]
pub struct MemoryElement {
    nodes: Rc<RefCell<Vec<Node>>>,
    index: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under `parent` (or at the top level)
    pub fn append(&self, parent: Option<&MemoryElement>, node: MemoryNode) -> MemoryElement {
        let mut node = node.0;
        node.parent = parent.map(|p| p.index);
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        MemoryElement {
            nodes: Rc::clone(&self.nodes),
            index: nodes.len() - 1,
        }
    }

    fn handle(&self, index: usize) -> MemoryElement {
        MemoryElement {
            nodes: Rc::clone(&self.nodes),
            index,
        }
    }

    fn select(&self, selector: &str, root: Option<usize>) -> Vec<MemoryElement> {
        let compounds = parse_selector(selector);
        let nodes = self.nodes.borrow();
        (0..nodes.len())
            .filter(|&i| root.is_none_or(|r| is_descendant(&nodes, i, r)))
            .filter(|&i| compounds.iter().any(|c| c.matches(&nodes[i])))
            .map(|i| self.handle(i))
            .collect()
    }
}

fn is_descendant(nodes: &[Node], index: usize, ancestor: usize) -> bool {
    let mut current = nodes[index].parent;
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = nodes[parent].parent;
    }
    false
}

impl MemoryElement {
    /// Change a form control's value, as a user typing would
    pub fn set_value(&self, value: &str) {
        self.nodes.borrow_mut()[self.index].value = Some(value.into());
    }
}

impl Element for MemoryElement {
    fn has_class(&self, class: &str) -> bool {
        self.nodes.borrow()[self.index].has_class(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.nodes.borrow()[self.index]
            .attribute(name)
            .map(str::to_string)
    }

    fn value(&self) -> Option<String> {
        self.nodes.borrow()[self.index].value.clone()
    }

    fn text(&self) -> String {
        self.nodes.borrow()[self.index].text.clone()
    }

    fn set_text(&self, text: &str) {
        self.nodes.borrow_mut()[self.index].text = text.into();
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn query(&self, selector: &str) -> Option<MemoryElement> {
        self.select(selector, None).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<MemoryElement> {
        self.select(selector, None)
    }

    fn query_within(&self, root: &MemoryElement, selector: &str) -> Option<MemoryElement> {
        self.select(selector, Some(root.index)).into_iter().next()
    }
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == node.tag)
            && self
                .id
                .as_ref()
                .is_none_or(|id| node.attribute("id") == Some(id.as_str()))
            && self.classes.iter().all(|c| node.has_class(c))
            && self.attributes.iter().all(|(name, value)| match value {
                Some(v) => node.attribute(name) == Some(v.as_str()),
                None => node.attribute(name).is_some(),
            })
    }
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_compound)
        .collect()
}

fn parse_compound(src: &str) -> Compound {
    const STARTS: [char; 3] = ['#', '.', '['];

    let mut compound = Compound::default();
    let tag_end = src.find(STARTS).unwrap_or(src.len());
    if tag_end > 0 {
        compound.tag = Some(src[..tag_end].to_ascii_lowercase());
    }

    let mut rest = &src[tag_end..];
    while let Some(first) = rest.chars().next() {
        match first {
            '[' => {
                let end = rest.find(']').unwrap_or(rest.len());
                let inner = &rest[1..end];
                let (name, value) = match inner.split_once('=') {
                    Some((n, v)) => (n.trim(), Some(v.trim().trim_matches(['"', '\'']).to_string())),
                    None => (inner.trim(), None),
                };
                compound.attributes.push((name.to_string(), value));
                rest = rest.get(end + 1..).unwrap_or("");
            }
            '#' | '.' => {
                let body = &rest[1..];
                let end = body.find(STARTS).unwrap_or(body.len());
                let ident = body[..end].to_string();
                if first == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
                rest = &body[end..];
            }
            _ => break,
        }
    }
    compound
}

enum Reply {
    Ready(Result<serde_json::Value>),
    Deferred(oneshot::Receiver<Result<serde_json::Value>>),
}

/// Scripted transport recording every request it receives.
///
/// Replies are consumed in request order. A deferred reply stays pending
/// until the test sends on the returned channel, which lets tests decide
/// the order in which concurrent responses arrive.
#[derive(Default)]
pub struct MockTransport {
    requests: RefCell<Vec<FormRequest>>,
    replies: RefCell<VecDeque<Reply>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON body
    pub fn respond(&self, body: serde_json::Value) {
        self.replies.borrow_mut().push_back(Reply::Ready(Ok(body)));
    }

    /// Queue a failure
    pub fn fail(&self, error: InteractionError) {
        self.replies.borrow_mut().push_back(Reply::Ready(Err(error)));
    }

    /// Queue a reply delivered later through the returned sender
    pub fn defer(&self) -> oneshot::Sender<Result<serde_json::Value>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<FormRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn submit(&self, request: &FormRequest) -> Result<serde_json::Value> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self.replies.borrow_mut().pop_front();

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(InteractionError::Network("request abandoned".into()))),
            None => Err(InteractionError::Network("no reply scripted".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> MemoryDocument {
        let doc = MemoryDocument::new();
        let form = doc.append(None, MemoryNode::new("form").id("subscribe-form"));
        doc.append(
            Some(&form),
            MemoryNode::new("input")
                .attr("name", "csrfmiddlewaretoken")
                .value("inner"),
        );
        doc.append(
            None,
            MemoryNode::new("input")
                .attr("name", "csrfmiddlewaretoken")
                .value("outer"),
        );
        doc.append(None, MemoryNode::new("button").class("like-button").class("btn"));
        doc.append(None, MemoryNode::new("button").class("dislike-button"));
        doc
    }

    #[test]
    fn test_selector_forms() {
        let doc = page();
        assert!(doc.query("#subscribe-form").is_some());
        assert!(doc.query("form#subscribe-form").is_some());
        assert!(doc.query("div#subscribe-form").is_none());
        assert_eq!(doc.query_all(".like-button, .dislike-button").len(), 2);
        assert_eq!(doc.query_all(".like-button.btn").len(), 1);
        assert_eq!(doc.query_all("input[name=csrfmiddlewaretoken]").len(), 2);
        assert_eq!(doc.query_all("input[name='csrfmiddlewaretoken']").len(), 2);
    }

    #[test]
    fn test_query_within_scopes_to_descendants() {
        let doc = page();
        let form = doc.query("#subscribe-form").unwrap();
        let input = doc
            .query_within(&form, "input[name=csrfmiddlewaretoken]")
            .unwrap();
        assert_eq!(input.value().as_deref(), Some("inner"));
    }

    #[test]
    fn test_set_text_all() {
        let doc = page();
        assert_eq!(doc.set_text_all("button", "x"), 2);
        assert!(doc.query_all("button").iter().all(|b| b.text() == "x"));
    }

    #[tokio::test]
    async fn test_transport_replays_in_order() {
        let transport = MockTransport::new();
        transport.respond(serde_json::json!({"n": 1}));
        transport.fail(InteractionError::Status(502));

        let request = FormRequest::post("/a/");
        assert_eq!(transport.submit(&request).await.unwrap()["n"], 1);
        assert!(matches!(
            transport.submit(&request).await,
            Err(InteractionError::Status(502))
        ));
        assert!(transport.submit(&request).await.is_err());
        assert_eq!(transport.requests().len(), 3);
    }
}
