use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, NewComment};
use crate::database::repository::CommentRepository;

/// Process-local store used for tests and database-less development runs
#[derive(Default)]
pub struct MemoryCommentRepository {
    // Insertion order; newest last
    comments: RwLock<Vec<Comment>>,
}

impl MemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing comments, e.g. to control `date` in tests
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments: RwLock::new(comments),
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DatabaseError> {
        let comment = comment.into_comment(Uuid::new_v4(), Utc::now());
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, DatabaseError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_all_sorted(&self) -> Result<Vec<Comment>, DatabaseError> {
        let comments = self.comments.read().await;
        // Stable sort over newest-inserted-first keeps same-timestamp ties deterministic
        let mut sorted: Vec<Comment> = comments.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sorted)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_comment(text: &str, user: Uuid) -> NewComment {
        NewComment {
            text: text.to_string(),
            user,
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_keeps_content() {
        let repo = MemoryCommentRepository::new();
        let user = Uuid::new_v4();

        let a = repo.create(new_comment("hello", user)).await.unwrap();
        let b = repo.create(new_comment("hello", user)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.text, "hello");
        assert_eq!(a.user, user);
        assert_eq!(repo.find_by_id(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let user = Uuid::new_v4();
        let old = new_comment("old", user).into_comment(Uuid::new_v4(), base);
        let new = new_comment("new", user).into_comment(Uuid::new_v4(), base + Duration::hours(1));
        // Seeded out of order on purpose
        let repo = MemoryCommentRepository::with_comments(vec![new.clone(), old.clone()]);

        let listed = repo.find_all_sorted().await.unwrap();
        assert_eq!(listed, vec![new, old]);
    }

    #[tokio::test]
    async fn equal_dates_list_latest_insert_first() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let user = Uuid::new_v4();
        let first = new_comment("first", user).into_comment(Uuid::new_v4(), date);
        let second = new_comment("second", user).into_comment(Uuid::new_v4(), date);
        let repo = MemoryCommentRepository::with_comments(vec![first.clone(), second.clone()]);

        assert_eq!(repo.find_all_sorted().await.unwrap(), vec![second, first]);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_matched() {
        let repo = MemoryCommentRepository::new();
        let comment = repo.create(new_comment("bye", Uuid::new_v4())).await.unwrap();

        assert!(repo.delete_by_id(comment.id).await.unwrap());
        assert!(!repo.delete_by_id(comment.id).await.unwrap());
        assert!(repo.find_by_id(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_404_maps_missing_row() {
        let repo = MemoryCommentRepository::new();
        let err = repo.find_404(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
