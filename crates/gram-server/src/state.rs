//! Application State

use std::sync::Arc;

use crate::store::{MemoryStore, UserId};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Posts, votes and subscriptions
    pub store: Arc<MemoryStore>,

    /// The user every request acts as
    pub user_id: UserId,

    /// Token the page embeds and every state-changing request must echo
    pub csrf_token: Arc<str>,
}
