use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentEntity {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReplyEntity {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
    pub reply_at: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Anything a user can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
    Reply(Uuid),
}

impl LikeTarget {
    pub fn id(&self) -> Uuid {
        match *self {
            LikeTarget::Post(id) | LikeTarget::Comment(id) | LikeTarget::Reply(id) => id,
        }
    }

    /// Like table and the column referencing the liked row.
    pub fn table(&self) -> (&'static str, &'static str) {
        match self {
            LikeTarget::Post(_) => ("post_likes", "post_id"),
            LikeTarget::Comment(_) => ("comment_likes", "comment_id"),
            LikeTarget::Reply(_) => ("reply_likes", "reply_id"),
        }
    }
}
