//! Demo Page
//!
//! Server-rendered page exposing the markup the bundle binds to: the
//! subscribe form, hidden CSRF inputs, vote controls and count displays.

use std::fmt::Write;

use gram_core::SubscriptionStatus;

use crate::store::{PostSummary, UserId};

/// Everything the page shows
pub struct PageContext<'a> {
    pub csrf_token: &'a str,
    pub profile_id: UserId,
    pub subscription: SubscriptionStatus,
    pub posts: &'a [PostSummary],
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(ctx: &PageContext<'_>) -> String {
    let token = escape(ctx.csrf_token);

    let mut posts = String::new();
    for post in ctx.posts {
        let id = post.id;
        let _ = write!(
            posts,
            r#"
      <article class="post">
        <h2>{name}</h2>
        <button type="button" class="btn like-button" data-post-id="{id}">Like</button>
        <span id="likes-count-{id}">{likes}</span>
        <button type="button" class="btn dislike-button" data-post-id="{id}">Dislike</button>
        <span id="dislikes-count-{id}">{dislikes}</span>
      </article>"#,
            name = escape(&post.name),
            likes = post.tally.likes_count,
            dislikes = post.tally.dislikes_count,
        );
    }

    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>gram</title>
    <link rel="stylesheet" href="/static/css/base.css">
  </head>
  <body>
    <input type="hidden" name="csrfmiddlewaretoken" value="{token}">
    <section class="profile">
      <img src="/static/img/avatar.svg" alt="" class="avatar">
      <form id="subscribe-form" action="/main_app/profile/{profile}/subscribe/" method="post">
        <input type="hidden" name="csrfmiddlewaretoken" value="{token}">
        <button type="submit" class="btn subscribe-button">{label}</button>
      </form>
    </section>
    <main class="feed">{posts}
    </main>
    <script type="module">
      import init from "/static/pkg/gram_web.js";
      init();
    </script>
  </body>
</html>
"#,
        profile = ctx.profile_id,
        label = ctx.subscription.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gram_core::{PostId, VoteTally};

    #[test]
    fn test_page_exposes_binding_contract() {
        let posts = [PostSummary {
            id: PostId(42),
            name: "Cats & <dogs>".into(),
            tally: VoteTally { likes_count: 5, dislikes_count: 2 },
        }];
        let html = render(&PageContext {
            csrf_token: "tok",
            profile_id: 2,
            subscription: SubscriptionStatus { is_subscribed: true },
            posts: &posts,
        });

        assert!(html.contains(r#"id="subscribe-form" action="/main_app/profile/2/subscribe/" method="post""#));
        assert!(html.contains(r#"name="csrfmiddlewaretoken" value="tok""#));
        assert!(html.contains(r#"class="btn subscribe-button">Unsubscribe<"#));
        assert!(html.contains(r#"class="btn like-button" data-post-id="42""#));
        assert!(html.contains(r#"<span id="likes-count-42">5</span>"#));
        assert!(html.contains(r#"<span id="dislikes-count-42">2</span>"#));
        assert!(html.contains("Cats &amp; &lt;dogs&gt;"));
    }
}
