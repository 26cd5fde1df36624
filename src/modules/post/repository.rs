use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::{CommentRow, InsertComment, InsertPost, InsertReply, PostRow, ReplyRow},
        schema::{CommentEntity, LikeTarget, PostEntity, ReplyEntity},
    },
};

#[async_trait::async_trait]
pub trait PostRepository {
    async fn create_post(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError>;

    async fn find_post(&self, post_id: &Uuid) -> Result<Option<PostRow>, error::SystemError>;

    /// `user_id`'s own and friends' posts first, then everyone else's, newest first.
    async fn find_feed(
        &self,
        user_id: &Uuid,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PostRow>, error::SystemError>;

    async fn find_posts_by_user(&self, user_id: &Uuid) -> Result<Vec<PostRow>, error::SystemError>;

    async fn search_posts(&self, query: &str, limit: i64)
    -> Result<Vec<PostRow>, error::SystemError>;

    async fn delete_post(&self, post_id: &Uuid) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait CommentRepository {
    async fn find_comment(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentEntity>, error::SystemError>;

    async fn find_comment_detail(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentRow>, error::SystemError>;

    /// Newest comment first.
    async fn find_comments_by_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<CommentRow>, error::SystemError>;

    async fn create_comment(
        &self,
        comment: &InsertComment,
    ) -> Result<CommentEntity, error::SystemError>;

    async fn update_comment(
        &self,
        comment_id: &Uuid,
        comment: &str,
    ) -> Result<Option<CommentEntity>, error::SystemError>;

    async fn delete_comment(&self, comment_id: &Uuid) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait ReplyRepository {
    async fn find_reply(&self, reply_id: &Uuid) -> Result<Option<ReplyEntity>, error::SystemError>;

    /// Oldest reply first within each comment.
    async fn find_replies_by_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<Vec<ReplyRow>, error::SystemError>;

    async fn create_reply(&self, reply: &InsertReply) -> Result<ReplyEntity, error::SystemError>;

    async fn update_reply(
        &self,
        reply_id: &Uuid,
        comment: &str,
    ) -> Result<Option<ReplyEntity>, error::SystemError>;

    async fn delete_reply(&self, reply_id: &Uuid) -> Result<bool, error::SystemError>;
}

#[async_trait::async_trait]
pub trait LikeRepository {
    async fn find_likes(&self, target: &LikeTarget) -> Result<Vec<Uuid>, error::SystemError>;

    async fn add_like(&self, target: &LikeTarget, user_id: &Uuid)
    -> Result<(), error::SystemError>;

    async fn remove_like(
        &self,
        target: &LikeTarget,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError>;
}

pub trait PostRepo:
    PostRepository + CommentRepository + ReplyRepository + LikeRepository + Send + Sync
{
}

impl<T> PostRepo for T where
    T: PostRepository + CommentRepository + ReplyRepository + LikeRepository + Send + Sync
{
}
