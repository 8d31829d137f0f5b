//! Like/Dislike Voting

use crate::config::InteractionConfig;
use crate::dom::{Document, Element};
use crate::error::{InteractionError, Result};
use crate::model::{CsrfToken, FormRequest, IS_LIKE_FIELD, VoteCounts, VoteDirection};
use crate::transport::Transport;

/// Handler behind every like and dislike control
pub struct VoteHandler<D, T> {
    document: D,
    transport: T,
    config: InteractionConfig,
}

impl<D, T> VoteHandler<D, T>
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

    /// Click entry point for the activated `control`. Failures are logged;
    /// nothing on the page changes.
    pub async fn activate(&self, control: &D::Element) {
        if let Err(e) = self.cast(control).await {
            tracing::error!(error = %e, "Vote request failed");
        }
    }

    /// Target post and direction of a control. The post id is the
    /// attribute text exactly as written in the page.
    pub fn target(&self, control: &D::Element) -> Result<(String, VoteDirection)> {
        let attribute = &self.config.post_id_attribute;
        let post_id = control
            .attribute(attribute)
            .ok_or_else(|| InteractionError::MissingAttribute {
                selector: self.config.vote_binding().selector,
                attribute: attribute.clone(),
            })?;

        let direction = if control.has_class(&self.config.like_class) {
            VoteDirection::Like
        } else {
            VoteDirection::Dislike
        };

        Ok((post_id, direction))
    }

    /// Send the vote and write the returned tally into the page.
    pub async fn cast(&self, control: &D::Element) -> Result<VoteCounts> {
        let (post_id, direction) = self.target(control)?;
        let token = self
            .document
            .query(&self.config.csrf_input)
            .and_then(|input| input.value())
            .map(CsrfToken::new);

        let request = FormRequest::post(self.config.vote_url(&post_id))
            .csrf(token.as_ref())
            .field(IS_LIKE_FIELD, direction.as_form_value());
        tracing::debug!(%post_id, ?direction, "Sending vote");

        let body = self.transport.submit(&request).await?;
        let counts = VoteCounts::from_body(&body)?;
        self.apply(&post_id, &counts);

        Ok(counts)
    }

    fn apply(&self, post_id: &str, counts: &VoteCounts) {
        if let Some(likes) = &counts.likes_count {
            self.document
                .set_text_all(&self.config.likes_count_selector(post_id), likes);
        }
        if let Some(dislikes) = &counts.dislikes_count {
            self.document
                .set_text_all(&self.config.dislikes_count_selector(post_id), dislikes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryDocument, MemoryElement, MemoryNode, MockTransport};
    use crate::model::{CSRF_FIELD, FormMethod};
    use serde_json::json;

    struct Page {
        doc: MemoryDocument,
        token: MemoryElement,
        like: MemoryElement,
        dislike: MemoryElement,
        likes: MemoryElement,
        dislikes: MemoryElement,
    }

    fn post_page(post_id: &str) -> Page {
        let doc = MemoryDocument::new();
        let token = doc.append(
            None,
            MemoryNode::new("input")
                .attr("name", "csrfmiddlewaretoken")
                .value("page-token"),
        );
        let like = doc.append(
            None,
            MemoryNode::new("button")
                .class("btn")
                .class("like-button")
                .attr("data-post-id", post_id),
        );
        let dislike = doc.append(
            None,
            MemoryNode::new("button")
                .class("dislike-button")
                .attr("data-post-id", post_id),
        );
        let likes = doc.append(
            None,
            MemoryNode::new("span").id(&format!("likes-count-{post_id}")).text("0"),
        );
        let dislikes = doc.append(
            None,
            MemoryNode::new("span").id(&format!("dislikes-count-{post_id}")).text("0"),
        );
        Page {
            doc,
            token,
            like,
            dislike,
            likes,
            dislikes,
        }
    }

    fn handler(page: &Page, transport: MockTransport) -> VoteHandler<MemoryDocument, MockTransport> {
        VoteHandler::new(page.doc.clone(), transport, InteractionConfig::default())
    }

    #[tokio::test]
    async fn test_like_posts_true() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 1, "dislikes_count": 0}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        let requests = handler.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, FormMethod::Post);
        assert_eq!(requests[0].url, "/main_app/42/like-dislike/");
        assert_eq!(requests[0].get(IS_LIKE_FIELD), Some("true"));
    }

    #[tokio::test]
    async fn test_dislike_posts_false() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 0, "dislikes_count": 1}));
        let handler = handler(&page, transport);

        handler.activate(&page.dislike).await;

        let requests = handler.transport.requests();
        assert_eq!(requests[0].url, "/main_app/42/like-dislike/");
        assert_eq!(requests[0].get(IS_LIKE_FIELD), Some("false"));
    }

    #[tokio::test]
    async fn test_counts_written_to_displays() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 5, "dislikes_count": 2}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(page.likes.text(), "5");
        assert_eq!(page.dislikes.text(), "2");
    }

    #[tokio::test]
    async fn test_token_matches_hidden_input_at_click_time() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 1, "dislikes_count": 0}));
        transport.respond(json!({"likes_count": 0, "dislikes_count": 0}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;
        page.token.set_value("fresh-token");
        handler.activate(&page.like).await;

        let requests = handler.transport.requests();
        assert_eq!(requests[0].get(CSRF_FIELD), Some("page-token"));
        assert_eq!(requests[1].get(CSRF_FIELD), Some("fresh-token"));
    }

    #[tokio::test]
    async fn test_last_response_wins() {
        let page = post_page("42");
        let transport = MockTransport::new();
        let first_reply = transport.defer();
        let second_reply = transport.defer();
        let handler = handler(&page, transport);

        let mut first = Box::pin(handler.activate(&page.like));
        let mut second = Box::pin(handler.activate(&page.like));
        assert!(futures::poll!(&mut first).is_pending());
        assert!(futures::poll!(&mut second).is_pending());
        assert_eq!(handler.transport.requests().len(), 2);

        // The second click's response arrives first.
        second_reply
            .send(Ok(json!({"likes_count": 1, "dislikes_count": 0})))
            .unwrap();
        second.await;
        assert_eq!(page.likes.text(), "1");

        first_reply
            .send(Ok(json!({"likes_count": 2, "dislikes_count": 0})))
            .unwrap();
        first.await;
        assert_eq!(page.likes.text(), "2");
    }

    #[tokio::test]
    async fn test_failure_changes_nothing() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.fail(InteractionError::Network("offline".into()));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(page.likes.text(), "0");
        assert_eq!(page.dislikes.text(), "0");
    }

    #[tokio::test]
    async fn test_missing_count_leaves_display() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 9}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(page.likes.text(), "9");
        assert_eq!(page.dislikes.text(), "0");
    }

    #[tokio::test]
    async fn test_counts_only_touch_target_post() {
        let page = post_page("42");
        let other = page.doc.append(
            None,
            MemoryNode::new("span").id("likes-count-7").text("3"),
        );
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 5, "dislikes_count": 2}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(other.text(), "3");
    }

    #[tokio::test]
    async fn test_post_id_used_as_written() {
        let page = post_page("042");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 3, "dislikes_count": 1}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(handler.transport.requests()[0].url, "/main_app/042/like-dislike/");
        assert_eq!(page.likes.text(), "3");
        assert_eq!(page.dislikes.text(), "1");
    }

    #[tokio::test]
    async fn test_float_and_string_counts_displayed() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": 5.0, "dislikes_count": "2"}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(page.likes.text(), "5");
        assert_eq!(page.dislikes.text(), "2");
    }

    #[tokio::test]
    async fn test_odd_count_does_not_block_the_other() {
        let page = post_page("42");
        let transport = MockTransport::new();
        transport.respond(json!({"likes_count": null, "dislikes_count": 4}));
        let handler = handler(&page, transport);

        handler.activate(&page.like).await;

        assert_eq!(page.likes.text(), "0");
        assert_eq!(page.dislikes.text(), "4");
    }

    #[tokio::test]
    async fn test_missing_post_id_sends_nothing() {
        let doc = MemoryDocument::new();
        let like = doc.append(None, MemoryNode::new("button").class("like-button"));
        let handler = VoteHandler::new(doc, MockTransport::new(), InteractionConfig::default());

        let result = handler.cast(&like).await;

        assert!(matches!(result, Err(InteractionError::MissingAttribute { .. })));
        assert!(handler.transport.requests().is_empty());
    }
}
