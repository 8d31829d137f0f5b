//! Server Configuration
//!
//! Read from the environment after `.env` has been loaded.

use std::path::PathBuf;

use anyhow::Context;

use crate::store::UserId;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Directory holding the bundle (`pkg/`), styles and images
    pub static_dir: PathBuf,

    /// The user every request acts as
    pub user_id: UserId,

    /// Token expected in `csrfmiddlewaretoken`
    pub csrf_token: String,

    /// Number of demo posts created at startup
    pub seed_posts: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: PathBuf::from("static"),
            user_id: 1,
            csrf_token: uuid::Uuid::new_v4().simple().to_string(),
            seed_posts: 3,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(user) = lookup("GRAM_USER_ID") {
            config.user_id = user
                .parse()
                .with_context(|| format!("GRAM_USER_ID must be a user id, got {user:?}"))?;
        }
        if let Some(token) = lookup("GRAM_CSRF_TOKEN").filter(|t| !t.is_empty()) {
            config.csrf_token = token;
        }
        if let Some(count) = lookup("GRAM_SEED_POSTS") {
            config.seed_posts = count
                .parse()
                .with_context(|| format!("GRAM_SEED_POSTS must be a count, got {count:?}"))?;
        }

        Ok(config)
    }
}
