/// Post service - orchestrates store access and aggregate mutations
///
/// Every mutating operation is a read-modify-write cycle: load the document,
/// apply the aggregate mutation in memory, write the whole document back.
/// The write is guarded by the store's version check; on a conflict the
/// cycle reloads and reapplies, so concurrent likes from the same user
/// cannot slip past the "not already liked" check.
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::models::{Like, Post};
use std::sync::Arc;
use uuid::Uuid;

/// Reload-and-reapply attempts before giving up on a contended post.
const MAX_SAVE_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>> {
        self.store.find_all().await
    }

    /// Get a post by id.
    pub async fn get(&self, post_id: Uuid) -> Result<Post> {
        let record = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound)?;
        Ok(record.post)
    }

    /// Create a post owned by `author_id`. Input shape has already been
    /// validated at the edge; the service only assembles and persists.
    pub async fn create(
        &self,
        author_id: Uuid,
        text: String,
        name: String,
        avatar: Option<String>,
    ) -> Result<Post> {
        let post = Post::new(author_id, text, name, avatar);
        self.store.insert(&post).await?;
        Ok(post)
    }

    /// Delete a post. Only the owner may do this.
    pub async fn delete(&self, post_id: Uuid, caller_id: Uuid) -> Result<()> {
        let record = self
            .store
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound)?;
        record.post.ensure_owner(caller_id)?;

        if !self.store.delete(post_id).await? {
            return Err(AppError::PostNotFound);
        }
        Ok(())
    }

    /// Like a post; returns the updated likes sequence.
    pub async fn like(&self, post_id: Uuid, caller_id: Uuid) -> Result<Vec<Like>> {
        let post = self
            .read_modify_write(post_id, |post| post.add_like(caller_id))
            .await?;
        Ok(post.likes)
    }

    /// Remove the caller's like; returns the updated likes sequence.
    pub async fn unlike(&self, post_id: Uuid, caller_id: Uuid) -> Result<Vec<Like>> {
        let post = self
            .read_modify_write(post_id, |post| post.remove_like(caller_id))
            .await?;
        Ok(post.likes)
    }

    /// Add a comment; returns the full updated post.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
        name: String,
        avatar: Option<String>,
    ) -> Result<Post> {
        self.read_modify_write(post_id, |post| {
            post.add_comment(author_id, text.clone(), name.clone(), avatar.clone())
        })
        .await
    }

    /// Remove a comment by id; returns the full updated post.
    ///
    /// Neither post nor comment ownership is checked here, matching the
    /// observed behavior of the endpoint this replaces.
    pub async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Post> {
        self.read_modify_write(post_id, |post| post.remove_comment(comment_id))
            .await
    }

    /// Load the post, apply `mutate`, save with the loaded version. A stale
    /// version means another writer got in between; reload and reapply.
    /// Domain failures and store errors surface immediately.
    async fn read_modify_write<F>(&self, post_id: Uuid, mut mutate: F) -> Result<Post>
    where
        F: FnMut(&mut Post) -> Result<()>,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let record = self
                .store
                .find_by_id(post_id)
                .await?
                .ok_or(AppError::PostNotFound)?;

            let mut post = record.post;
            mutate(&mut post)?;

            if self.store.save(&post, record.version).await? {
                return Ok(post);
            }

            tracing::debug!(%post_id, attempt, "stale post version on save, reloading");
        }

        tracing::warn!(%post_id, "post save retries exhausted");
        Err(AppError::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::post_store::{MockPostStore, PostRecord};
    use crate::db::MemoryPostStore;
    use chrono::{Duration, Utc};

    fn memory_service() -> PostService {
        PostService::new(Arc::new(MemoryPostStore::new()))
    }

    async fn seeded_post(service: &PostService, owner: Uuid) -> Post {
        service
            .create(
                owner,
                "A post that is long enough".to_string(),
                "Owner".to_string(),
                None,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = memory_service();
        let owner = Uuid::new_v4();

        let post = seeded_post(&service, owner).await;
        let loaded = service.get(post.id).await.unwrap();

        assert_eq!(loaded, post);
        assert!(loaded.likes.is_empty());
        assert!(loaded.comments.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let service = memory_service();

        let err = service.get(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::PostNotFound));
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = Arc::new(MemoryPostStore::new());
        let service = PostService::new(store.clone());

        let mut older = Post::new(
            Uuid::new_v4(),
            "An older post with text".to_string(),
            "A".to_string(),
            None,
        );
        older.date = Utc::now() - Duration::hours(2);
        let newer = Post::new(
            Uuid::new_v4(),
            "A newer post with text".to_string(),
            "B".to_string(),
            None,
        );
        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();

        let posts = service.list_all().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, newer.id);
        assert_eq!(posts[1].id, older.id);
    }

    #[tokio::test]
    async fn test_like_scenario() {
        let service = memory_service();
        let post = seeded_post(&service, Uuid::new_v4()).await;
        let liker = Uuid::new_v4();

        let likes = service.like(post.id, liker).await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].user_id, liker);

        let err = service.like(post.id, liker).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyLiked));

        let likes = service.unlike(post.id, liker).await.unwrap();
        assert!(likes.is_empty());
    }

    #[tokio::test]
    async fn test_unlike_never_liked() {
        let service = memory_service();
        let post = seeded_post(&service, Uuid::new_v4()).await;

        let err = service.unlike(post.id, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotLiked));
        assert!(service.get(post.id).await.unwrap().likes.is_empty());
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let service = memory_service();

        let err = service.like(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::PostNotFound));
    }

    #[tokio::test]
    async fn test_comment_scenario() {
        let service = memory_service();
        let post = seeded_post(&service, Uuid::new_v4()).await;
        let author = Uuid::new_v4();

        let updated = service
            .add_comment(
                post.id,
                author,
                "great post".to_string(),
                "Commenter".to_string(),
                None,
            )
            .await
            .unwrap();
        let comment_id = updated.comments[0].id;

        let err = service
            .remove_comment(post.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CommentNotFound));
        assert_eq!(service.get(post.id).await.unwrap().comments.len(), 1);

        let updated = service.remove_comment(post.id, comment_id).await.unwrap();
        assert!(updated.comments.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let service = memory_service();
        let owner = Uuid::new_v4();
        let post = seeded_post(&service, owner).await;

        let err = service.delete(post.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
        // A rejected delete must leave the post retrievable.
        assert!(service.get(post.id).await.is_ok());

        service.delete(post.id, owner).await.unwrap();
        let err = service.get(post.id).await.unwrap_err();
        assert!(matches!(err, AppError::PostNotFound));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let service = memory_service();

        let err = service
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PostNotFound));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut store = MockPostStore::new();
        store
            .expect_find_all()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolClosed)));
        let service = PostService::new(Arc::new(store));

        let err = service.list_all().await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_stale_save_reloads_and_succeeds() {
        let post = Post::new(
            Uuid::new_v4(),
            "A post that is long enough".to_string(),
            "Owner".to_string(),
            None,
        );
        let post_id = post.id;

        let mut store = MockPostStore::new();
        let loaded = post.clone();
        store.expect_find_by_id().times(2).returning(move |_| {
            Ok(Some(PostRecord {
                post: loaded.clone(),
                version: 4,
            }))
        });
        // First save loses the race, second one lands.
        let mut saves = 0;
        store.expect_save().times(2).returning(move |_, version| {
            assert_eq!(version, 4);
            saves += 1;
            Ok(saves > 1)
        });
        let service = PostService::new(Arc::new(store));

        let likes = service.like(post_id, Uuid::new_v4()).await.unwrap();

        assert_eq!(likes.len(), 1);
    }

    #[tokio::test]
    async fn test_save_retries_exhausted() {
        let post = Post::new(
            Uuid::new_v4(),
            "A post that is long enough".to_string(),
            "Owner".to_string(),
            None,
        );
        let post_id = post.id;

        let mut store = MockPostStore::new();
        let loaded = post.clone();
        store
            .expect_find_by_id()
            .times(MAX_SAVE_ATTEMPTS as usize)
            .returning(move |_| {
                Ok(Some(PostRecord {
                    post: loaded.clone(),
                    version: 0,
                }))
            });
        store
            .expect_save()
            .times(MAX_SAVE_ATTEMPTS as usize)
            .returning(|_, _| Ok(false));
        let service = PostService::new(Arc::new(store));

        let err = service.like(post_id, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict));
    }
}
