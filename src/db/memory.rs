/// In-process post store
///
/// Implements the same contract as the PostgreSQL store, including the
/// version check on `save`. Used by the test suites and handy for running
/// the service without a database.
use crate::db::post_store::{PostRecord, PostStore};
use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryPostStore {
    inner: RwLock<HashMap<Uuid, (Post, i64)>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_all(&self) -> Result<Vec<Post>> {
        let guard = self.inner.read().await;
        let mut posts: Vec<Post> = guard.values().map(|(post, _)| post.clone()).collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>> {
        let guard = self.inner.read().await;
        Ok(guard.get(&id).map(|(post, version)| PostRecord {
            post: post.clone(),
            version: *version,
        }))
    }

    async fn insert(&self, post: &Post) -> Result<()> {
        let mut guard = self.inner.write().await;
        guard.insert(post.id, (post.clone(), 0));
        Ok(())
    }

    async fn save(&self, post: &Post, expected_version: i64) -> Result<bool> {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&post.id) {
            Some((stored, version)) if *version == expected_version => {
                *stored = post.clone();
                *version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut guard = self.inner.write().await;
        Ok(guard.remove(&id).is_some())
    }
}
