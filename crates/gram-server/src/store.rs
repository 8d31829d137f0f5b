//! In-Memory Social Store
//!
//! Posts with per-user like/dislike sets and follower → profile
//! subscriptions. A user is never in both vote sets of one post.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use thiserror::Error;

use gram_core::{PostId, SubscriptionStatus, VoteDirection, VoteTally};

pub type UserId = u64;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Post {0} not found")]
    PostNotFound(PostId),

    #[error("Users cannot subscribe to themselves")]
    SelfSubscription,

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Default)]
struct PostEntry {
    name: String,
    likes: HashSet<UserId>,
    dislikes: HashSet<UserId>,
}

impl PostEntry {
    fn tally(&self) -> VoteTally {
        VoteTally {
            likes_count: self.likes.len() as u64,
            dislikes_count: self.dislikes.len() as u64,
        }
    }

    /// Repeating a vote withdraws it; the opposite vote replaces it.
    fn vote(&mut self, user: UserId, direction: VoteDirection) {
        let (chosen, other) = match direction {
            VoteDirection::Like => (&mut self.likes, &mut self.dislikes),
            VoteDirection::Dislike => (&mut self.dislikes, &mut self.likes),
        };

        if !chosen.remove(&user) {
            other.remove(&user);
            chosen.insert(user);
        }
    }
}

/// A post as listed on the demo page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostSummary {
    pub id: PostId,
    pub name: String,
    pub tally: VoteTally,
}

#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<BTreeMap<PostId, PostEntry>>,
    subscriptions: RwLock<HashSet<(UserId, UserId)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding posts `1..=count`
    pub fn seeded(count: u64) -> Self {
        let store = Self::new();
        if let Ok(mut posts) = store.posts.write() {
            for id in 1..=count {
                posts.insert(
                    PostId(id),
                    PostEntry {
                        name: format!("Post #{id}"),
                        ..PostEntry::default()
                    },
                );
            }
        }
        store
    }

    pub fn add_post(&self, id: PostId, name: impl Into<String>) -> Result<()> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        posts.entry(id).or_default().name = name.into();
        Ok(())
    }

    pub fn posts(&self) -> Result<Vec<PostSummary>> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(posts
            .iter()
            .map(|(id, entry)| PostSummary {
                id: *id,
                name: entry.name.clone(),
                tally: entry.tally(),
            })
            .collect())
    }

    pub fn tally(&self, post: PostId) -> Result<VoteTally> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        posts
            .get(&post)
            .map(PostEntry::tally)
            .ok_or(StoreError::PostNotFound(post))
    }

    /// Apply a vote and return the post's new tally
    pub fn vote(&self, user: UserId, post: PostId, direction: VoteDirection) -> Result<VoteTally> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        let entry = posts.get_mut(&post).ok_or(StoreError::PostNotFound(post))?;
        entry.vote(user, direction);
        Ok(entry.tally())
    }

    pub fn is_subscribed(&self, follower: UserId, profile: UserId) -> Result<bool> {
        let subscriptions = self.subscriptions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(subscriptions.contains(&(follower, profile)))
    }

    /// Flip the follower's subscription to `profile`
    pub fn toggle_subscription(&self, follower: UserId, profile: UserId) -> Result<SubscriptionStatus> {
        if follower == profile {
            return Err(StoreError::SelfSubscription);
        }

        let mut subscriptions = self.subscriptions.write().map_err(|_| StoreError::Poisoned)?;
        let is_subscribed = if subscriptions.remove(&(follower, profile)) {
            false
        } else {
            subscriptions.insert((follower, profile));
            true
        };

        Ok(SubscriptionStatus { is_subscribed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_then_like_again_withdraws() {
        let store = MemoryStore::seeded(1);

        let tally = store.vote(7, PostId(1), VoteDirection::Like).unwrap();
        assert_eq!(tally, VoteTally { likes_count: 1, dislikes_count: 0 });

        let tally = store.vote(7, PostId(1), VoteDirection::Like).unwrap();
        assert_eq!(tally, VoteTally { likes_count: 0, dislikes_count: 0 });
    }

    #[test]
    fn test_opposite_vote_moves() {
        let store = MemoryStore::seeded(1);

        store.vote(7, PostId(1), VoteDirection::Like).unwrap();
        let tally = store.vote(7, PostId(1), VoteDirection::Dislike).unwrap();

        assert_eq!(tally, VoteTally { likes_count: 0, dislikes_count: 1 });
    }

    #[test]
    fn test_votes_are_per_user() {
        let store = MemoryStore::seeded(1);

        store.vote(1, PostId(1), VoteDirection::Like).unwrap();
        store.vote(2, PostId(1), VoteDirection::Like).unwrap();
        let tally = store.vote(3, PostId(1), VoteDirection::Dislike).unwrap();

        assert_eq!(tally, VoteTally { likes_count: 2, dislikes_count: 1 });
    }

    #[test]
    fn test_unknown_post() {
        let store = MemoryStore::seeded(2);
        assert_eq!(
            store.vote(1, PostId(3), VoteDirection::Like),
            Err(StoreError::PostNotFound(PostId(3)))
        );
        assert!(store.tally(PostId(3)).is_err());
    }

    #[test]
    fn test_subscription_toggles() {
        let store = MemoryStore::new();

        assert!(store.toggle_subscription(1, 2).unwrap().is_subscribed);
        assert!(store.is_subscribed(1, 2).unwrap());
        assert!(!store.is_subscribed(2, 1).unwrap());
        assert!(!store.toggle_subscription(1, 2).unwrap().is_subscribed);
        assert!(!store.is_subscribed(1, 2).unwrap());
    }

    #[test]
    fn test_self_subscription_rejected() {
        let store = MemoryStore::new();
        assert_eq!(store.toggle_subscription(4, 4), Err(StoreError::SelfSubscription));
    }

    #[test]
    fn test_seeded_posts_listed_in_order() {
        let store = MemoryStore::seeded(3);
        store.add_post(PostId(10), "Sunset").unwrap();

        let posts = store.posts().unwrap();
        let ids: Vec<u64> = posts.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 10]);
        assert_eq!(posts[3].name, "Sunset");
    }
}
