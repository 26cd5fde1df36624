use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::model::UserSummary;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostModel {
    #[validate(length(min = 1, message = "You must write something to post"))]
    pub description: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedBody {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentModel {
    #[validate(length(min = 1, message = "Comment can not be empty"))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyModel {
    #[validate(length(min = 1, message = "Comment can not be empty"))]
    pub comment: String,
    pub reply_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditCommentModel {
    #[validate(length(min = 1, message = "Comment can not be empty"))]
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct InsertPost {
    pub user_id: Uuid,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsertComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
}

#[derive(Debug, Clone)]
pub struct InsertReply {
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
    pub reply_at: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_profile_url: Option<String>,
    pub author_profession: Option<String>,
    pub author_location: Option<String>,
    pub likes: Vec<Uuid>,
    pub comment_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_profile_url: Option<String>,
    pub author_profession: Option<String>,
    pub author_location: Option<String>,
    pub likes: Vec<Uuid>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReplyRow {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub from_name: String,
    pub reply_at: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_profile_url: Option<String>,
    pub author_profession: Option<String>,
    pub author_location: Option<String>,
    pub likes: Vec<Uuid>,
}

macro_rules! author {
    ($row:expr) => {
        UserSummary {
            id: $row.user_id,
            first_name: $row.author_first_name,
            last_name: $row.author_last_name,
            profile_url: $row.author_profile_url,
            profession: $row.author_profession,
            location: $row.author_location,
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub description: String,
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    pub comment_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        PostResponse {
            id: row.id,
            description: row.description,
            image: row.image,
            likes: row.likes,
            comment_count: row.comment_count,
            created_at: row.created_at,
            user: author!(row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user: UserSummary,
    pub comment: String,
    pub from: String,
    pub reply_at: Option<String>,
    pub likes: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ReplyRow> for ReplyResponse {
    fn from(row: ReplyRow) -> Self {
        ReplyResponse {
            id: row.id,
            comment_id: row.comment_id,
            comment: row.comment,
            from: row.from_name,
            reply_at: row.reply_at,
            likes: row.likes,
            created_at: row.created_at,
            user: author!(row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user: UserSummary,
    pub comment: String,
    pub from: String,
    pub likes: Vec<Uuid>,
    pub replies: Vec<ReplyResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl CommentResponse {
    pub fn new(row: CommentRow, replies: Vec<ReplyResponse>) -> Self {
        CommentResponse {
            id: row.id,
            post_id: row.post_id,
            comment: row.comment,
            from: row.from_name,
            likes: row.likes,
            created_at: row.created_at,
            user: author!(row),
            replies,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub id: Uuid,
}
