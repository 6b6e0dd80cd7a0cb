use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, NewComment};

/// Storage operations over comment documents. Each call is atomic per document.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment, assigning its `id` and `date`
    async fn create(&self, comment: NewComment) -> Result<Comment, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError>;

    /// All comments, newest `date` first
    async fn find_all_sorted(&self) -> Result<Vec<Comment>, DatabaseError>;

    /// Remove a comment. Returns false when nothing matched.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Like `find_by_id`, but a missing row is an error
    async fn find_404(&self, id: Uuid) -> Result<Comment, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Comment not found".to_string()))
    }
}

pub type SharedRepository = Arc<dyn CommentRepository>;
