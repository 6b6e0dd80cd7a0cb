use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, NewComment};
use crate::database::repository::CommentRepository;

/// Comments stored in the Postgres `comments` table
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let comment = comment.into_comment(Uuid::new_v4(), Utc::now());

        let saved = sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (id, text, "user", date)
               VALUES ($1, $2, $3, $4)
               RETURNING id, text, "user", date"#,
        )
        .bind(comment.id)
        .bind(&comment.text)
        .bind(comment.user)
        .bind(comment.date)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted comment {}", saved.id);
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"SELECT id, text, "user", date FROM comments WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_all_sorted(&self) -> Result<Vec<Comment>, DatabaseError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"SELECT id, text, "user", date FROM comments ORDER BY date DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!("Deleted comment {} ({} rows)", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
