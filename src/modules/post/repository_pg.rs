use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        post::{
            model::{CommentRow, InsertComment, InsertPost, InsertReply, PostRow, ReplyRow},
            repository::{CommentRepository, LikeRepository, PostRepository, ReplyRepository},
            schema::{CommentEntity, LikeTarget, PostEntity, ReplyEntity},
        },
        user::repository_pg::like_pattern,
    },
};

const POST_SELECT: &str = r#"
    SELECT
        p.id,
        p.user_id,
        p.description,
        p.image,
        p.created_at,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.profile_url AS author_profile_url,
        u.profession AS author_profession,
        u.location AS author_location,
        COALESCE(
            (SELECT array_agg(pl.user_id) FROM post_likes pl WHERE pl.post_id = p.id),
            '{}'::uuid[]
        ) AS likes,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT
        c.id,
        c.post_id,
        c.user_id,
        c.comment,
        c.from_name,
        c.created_at,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.profile_url AS author_profile_url,
        u.profession AS author_profession,
        u.location AS author_location,
        COALESCE(
            (SELECT array_agg(cl.user_id) FROM comment_likes cl WHERE cl.comment_id = c.id),
            '{}'::uuid[]
        ) AS likes
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

const REPLY_SELECT: &str = r#"
    SELECT
        r.id,
        r.comment_id,
        r.user_id,
        r.comment,
        r.from_name,
        r.reply_at,
        r.created_at,
        u.first_name AS author_first_name,
        u.last_name AS author_last_name,
        u.profile_url AS author_profile_url,
        u.profession AS author_profession,
        u.location AS author_location,
        COALESCE(
            (SELECT array_agg(rl.user_id) FROM reply_likes rl WHERE rl.reply_id = r.id),
            '{}'::uuid[]
        ) AS likes
    FROM replies r
    JOIN users u ON u.id = r.user_id
"#;

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

#[derive(Clone)]
pub struct PostRepositoryPg {
    pool: sqlx::PgPool,
}

impl PostRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PostRepositoryPg {
    async fn create_post(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError> {
        let post = sqlx::query_as::<_, PostEntity>(
            r#"
            INSERT INTO posts (id, user_id, description, image)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(post.user_id)
        .bind(&post.description)
        .bind(&post.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_post(&self, post_id: &Uuid) -> Result<Option<PostRow>, error::SystemError> {
        let post = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_feed(
        &self,
        user_id: &Uuid,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PostRow>, error::SystemError> {
        let posts = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            {POST_SELECT}
            WHERE ($2::text IS NULL OR p.description ILIKE $2)
            ORDER BY
                (
                    p.user_id = $1
                    OR EXISTS (
                        SELECT 1 FROM friends f
                        WHERE (f.user_a = $1 AND f.user_b = p.user_id)
                           OR (f.user_b = $1 AND f.user_a = p.user_id)
                    )
                ) DESC,
                p.created_at DESC
            LIMIT $3
            "#
        ))
        .bind(user_id)
        .bind(search.map(like_pattern))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_posts_by_user(&self, user_id: &Uuid) -> Result<Vec<PostRow>, error::SystemError> {
        let posts = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.user_id = $1 ORDER BY p.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn search_posts(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<PostRow>, error::SystemError> {
        let posts = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE p.description ILIKE $1 ORDER BY p.created_at DESC LIMIT $2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn delete_post(&self, post_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}

#[async_trait::async_trait]
impl CommentRepository for PostRepositoryPg {
    async fn find_comment(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>("SELECT * FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn find_comment_detail(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentRow>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentRow>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn find_comments_by_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<CommentRow>, error::SystemError> {
        let comments = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn create_comment(
        &self,
        comment: &InsertComment,
    ) -> Result<CommentEntity, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>(
            r#"
            INSERT INTO comments (id, post_id, user_id, comment, from_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.comment)
        .bind(&comment.from_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn update_comment(
        &self,
        comment_id: &Uuid,
        comment: &str,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>(
            "UPDATE comments SET comment = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(comment_id)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}

#[async_trait::async_trait]
impl ReplyRepository for PostRepositoryPg {
    async fn find_reply(&self, reply_id: &Uuid) -> Result<Option<ReplyEntity>, error::SystemError> {
        let reply = sqlx::query_as::<_, ReplyEntity>("SELECT * FROM replies WHERE id = $1")
            .bind(reply_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reply)
    }

    async fn find_replies_by_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<Vec<ReplyRow>, error::SystemError> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let replies = sqlx::query_as::<_, ReplyRow>(&format!(
            "{REPLY_SELECT} WHERE r.comment_id = ANY($1) ORDER BY r.created_at ASC, r.id ASC"
        ))
        .bind(comment_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(replies)
    }

    async fn create_reply(&self, reply: &InsertReply) -> Result<ReplyEntity, error::SystemError> {
        let reply = sqlx::query_as::<_, ReplyEntity>(
            r#"
            INSERT INTO replies (id, comment_id, user_id, comment, from_name, reply_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new_id())
        .bind(reply.comment_id)
        .bind(reply.user_id)
        .bind(&reply.comment)
        .bind(&reply.from_name)
        .bind(&reply.reply_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(reply)
    }

    async fn update_reply(
        &self,
        reply_id: &Uuid,
        comment: &str,
    ) -> Result<Option<ReplyEntity>, error::SystemError> {
        let reply = sqlx::query_as::<_, ReplyEntity>(
            "UPDATE replies SET comment = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(reply_id)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reply)
    }

    async fn delete_reply(&self, reply_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(reply_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}

#[async_trait::async_trait]
impl LikeRepository for PostRepositoryPg {
    async fn find_likes(&self, target: &LikeTarget) -> Result<Vec<Uuid>, error::SystemError> {
        let (table, column) = target.table();
        let likes: Vec<Uuid> =
            sqlx::query_scalar(&format!("SELECT user_id FROM {table} WHERE {column} = $1"))
                .bind(target.id())
                .fetch_all(&self.pool)
                .await?;
        Ok(likes)
    }

    async fn add_like(
        &self,
        target: &LikeTarget,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let (table, column) = target.table();
        sqlx::query(&format!(
            "INSERT INTO {table} ({column}, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        ))
        .bind(target.id())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_like(
        &self,
        target: &LikeTarget,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let (table, column) = target.table();
        sqlx::query(&format!("DELETE FROM {table} WHERE {column} = $1 AND user_id = $2"))
            .bind(target.id())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
