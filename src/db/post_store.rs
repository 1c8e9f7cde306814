use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// A post as loaded from the store, together with the document version the
/// caller must present when writing it back.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: Post,
    pub version: i64,
}

/// Document store for post aggregates.
///
/// Posts are persisted as whole documents; `save` overwrites the entire
/// document and is guarded by an optimistic version check so that two
/// concurrent read-modify-write cycles on the same post cannot silently
/// drop each other's changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>>;

    /// Load one post with its current version.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>>;

    /// Persist a brand-new post at version 0.
    async fn insert(&self, post: &Post) -> Result<()>;

    /// Overwrite the stored document if its version still matches
    /// `expected_version`. Returns `Ok(false)` when the check fails.
    async fn save(&self, post: &Post, expected_version: i64) -> Result<bool>;

    /// Delete a post. Returns `Ok(false)` when no such post exists.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// PostgreSQL-backed post store.
///
/// Each post lives in a single jsonb column; likes and comments never leave
/// the document. `created_at` mirrors the post date so listing can be done
/// with an index instead of a jsonb extraction.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_all(&self) -> Result<Vec<Post>> {
        let docs: Vec<Json<Post>> =
            sqlx::query_scalar("SELECT doc FROM posts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(docs.into_iter().map(|Json(post)| post).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>> {
        let row = sqlx::query_as::<_, (Json<Post>, i64)>(
            "SELECT doc, version FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(post), version)| PostRecord { post, version }))
    }

    async fn insert(&self, post: &Post) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, doc, version, created_at)
            VALUES ($1, $2, 0, $3)
            "#,
        )
        .bind(post.id)
        .bind(Json(post))
        .bind(post.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, post: &Post, expected_version: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET doc = $2, version = version + 1
            WHERE id = $1 AND version = $3
            "#,
        )
        .bind(post.id)
        .bind(Json(post))
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
