//! # gram-core
//!
//! Interaction logic for the subscribe toggle and like/dislike voting controls
//! of a server-rendered page, written against abstract DOM and transport seams.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     click on a control                        │
//! │  ┌──────────────────┐   ┌──────────────┐   ┌──────────────┐  │
//! │  │ SubscriptionToggle│   │  Document /  │   │  Transport   │  │
//! │  │   VoteHandler     │───│   Element    │───│  (Strategy)  │  │
//! │  └──────────────────┘   └──────────────┘   └──────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never cache server state: every click reads the CSRF token and
//! element attributes afresh, issues one request, and writes the server's
//! answer back into the page.

pub mod config;
pub mod dom;
pub mod error;
pub mod mock;
pub mod model;
pub mod subscription;
pub mod transport;
pub mod vote;

pub use config::InteractionConfig;
pub use dom::{ClickBinding, Document, Element};
pub use error::{InteractionError, Result};
pub use model::{
    CsrfToken, FormMethod, FormRequest, PostId, SubscriptionStatus, VoteCounts, VoteDirection,
    VoteTally,
};
pub use subscription::SubscriptionToggle;
pub use transport::Transport;
pub use vote::VoteHandler;
