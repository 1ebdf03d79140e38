use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, author_id: Uuid, title: &str, content: &str)
        -> Result<Uuid, StoreError>;

    /// Update the post only if `author_id` owns it. `None` fields are left as is.
    /// Returns [`StoreError::NotFound`] when no owned row matched.
    async fn update(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;
}

#[derive(Clone)]
pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn create(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Uuid, StoreError> {
        let (id,) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO posts (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(content)
        .bind(author_id)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(id)
    }

    async fn update(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<(), StoreError> {
        // Single statement so the ownership check and the write are atomic.
        let result = sqlx::query(
            r#"
            UPDATE posts
               SET title = COALESCE($3, title),
                   content = COALESCE($4, content)
             WHERE id = $1 AND author_id = $2
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(title)
        .bind(content)
        .execute(&self.db)
        .await
        .map_err(StoreError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, author_id, created_at
            FROM posts
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
