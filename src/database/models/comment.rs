use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub user: Uuid,
    pub date: DateTime<Utc>,
}

/// Comment content before the store assigns `id` and `date`
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user: Uuid,
}

impl NewComment {
    /// Materialize with store-assigned identity and timestamp
    pub fn into_comment(self, id: Uuid, date: DateTime<Utc>) -> Comment {
        Comment {
            id,
            text: self.text,
            user: self.user,
            date,
        }
    }
}

impl Comment {
    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.user == user
    }
}
