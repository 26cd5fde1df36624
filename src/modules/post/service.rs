use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::{
    api::error,
    constants::{FEED_LIMIT, SEARCH_LIMIT},
    modules::{
        post::{
            model::{
                CommentModel, CommentResponse, CreatePostModel, InsertComment, InsertPost,
                InsertReply, PostResponse, ReplyModel, ReplyResponse,
            },
            repository::PostRepo,
            schema::{CommentEntity, LikeTarget, PostEntity, ReplyEntity},
        },
        user::repository::UserRepository,
    },
};

fn non_blank(text: &str, message: &'static str) -> Result<String, error::SystemError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(error::SystemError::bad_request(message));
    }
    Ok(text.to_string())
}

#[derive(Clone)]
pub struct PostService<R, U>
where
    R: PostRepo,
    U: UserRepository + Send + Sync,
{
    post_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> PostService<R, U>
where
    R: PostRepo,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(post_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        log::info!("PostService initialized with dependencies");
        PostService { post_repo, user_repo }
    }

    /// Comments are signed with the author's current name; clients can't choose it.
    async fn display_name(&self, user_id: &Uuid) -> Result<String, error::SystemError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("User not found"))?;
        Ok(user.display_name())
    }

    async fn toggle_like(&self, target: LikeTarget, user_id: Uuid) -> Result<(), error::SystemError> {
        let likes = self.post_repo.find_likes(&target).await?;

        if likes.contains(&user_id) {
            self.post_repo.remove_like(&target, &user_id).await
        } else {
            self.post_repo.add_like(&target, &user_id).await
        }
    }

    async fn owned_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), error::SystemError> {
        let post = self
            .post_repo
            .find_post(&post_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))?;

        if post.user_id != user_id {
            return Err(error::SystemError::forbidden("You can only delete your own posts"));
        }
        Ok(())
    }

    async fn owned_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CommentEntity, error::SystemError> {
        let comment = self
            .post_repo
            .find_comment(&comment_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Comment not found"))?;

        if comment.user_id != user_id {
            return Err(error::SystemError::forbidden("You can only modify your own comments"));
        }
        Ok(comment)
    }

    async fn reply_of(
        &self,
        comment_id: Uuid,
        reply_id: Uuid,
    ) -> Result<ReplyEntity, error::SystemError> {
        self.post_repo
            .find_reply(&reply_id)
            .await?
            .filter(|reply| reply.comment_id == comment_id)
            .ok_or_else(|| error::SystemError::not_found("Reply not found"))
    }

    async fn owned_reply(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
    ) -> Result<ReplyEntity, error::SystemError> {
        let reply = self.reply_of(comment_id, reply_id).await?;

        if reply.user_id != user_id {
            return Err(error::SystemError::forbidden("You can only modify your own replies"));
        }
        Ok(reply)
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        post: CreatePostModel,
    ) -> Result<PostResponse, error::SystemError> {
        let description = non_blank(&post.description, "You must write something to post")?;

        let created: PostEntity = self
            .post_repo
            .create_post(&InsertPost { user_id, description, image: post.image })
            .await?;

        self.get_post(created.id).await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostResponse, error::SystemError> {
        self.post_repo
            .find_post(&post_id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Post not found"))
    }

    pub async fn get_posts(
        &self,
        user_id: Uuid,
        search: Option<String>,
    ) -> Result<Vec<PostResponse>, error::SystemError> {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let posts = self.post_repo.find_feed(&user_id, search.as_deref(), FEED_LIMIT).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn get_user_posts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PostResponse>, error::SystemError> {
        let posts = self.post_repo.find_posts_by_user(&user_id).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn search_posts(&self, query: &str) -> Result<Vec<PostResponse>, error::SystemError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let posts = self.post_repo.search_posts(query, SEARCH_LIMIT).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), error::SystemError> {
        self.owned_post(user_id, post_id).await?;
        self.post_repo.delete_post(&post_id).await?;
        log::info!("Post {} deleted by {}", post_id, user_id);
        Ok(())
    }

    pub async fn like_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<PostResponse, error::SystemError> {
        self.get_post(post_id).await?;
        self.toggle_like(LikeTarget::Post(post_id), user_id).await?;
        self.get_post(post_id).await
    }

    pub async fn get_comments(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, error::SystemError> {
        if self.post_repo.find_post(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        let comments = self.post_repo.find_comments_by_post(&post_id).await?;
        let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();

        let mut replies: HashMap<Uuid, Vec<ReplyResponse>> = HashMap::new();
        for reply in self.post_repo.find_replies_by_comments(&ids).await? {
            replies.entry(reply.comment_id).or_default().push(ReplyResponse::from(reply));
        }

        Ok(comments
            .into_iter()
            .map(|c| {
                let thread = replies.remove(&c.id).unwrap_or_default();
                CommentResponse::new(c, thread)
            })
            .collect())
    }

    pub async fn get_comment(&self, comment_id: Uuid) -> Result<CommentResponse, error::SystemError> {
        let comment = self
            .post_repo
            .find_comment_detail(&comment_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Comment not found"))?;

        let replies = self
            .post_repo
            .find_replies_by_comments(&[comment_id])
            .await?
            .into_iter()
            .map(ReplyResponse::from)
            .collect();

        Ok(CommentResponse::new(comment, replies))
    }

    pub async fn comment_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        body: CommentModel,
    ) -> Result<CommentResponse, error::SystemError> {
        let comment = non_blank(&body.comment, "Comment can not be empty")?;

        if self.post_repo.find_post(&post_id).await?.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        let from_name = self.display_name(&user_id).await?;
        let created = self
            .post_repo
            .create_comment(&InsertComment { post_id, user_id, comment, from_name })
            .await?;

        self.get_comment(created.id).await
    }

    pub async fn reply_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        body: ReplyModel,
    ) -> Result<CommentResponse, error::SystemError> {
        let comment = non_blank(&body.comment, "Comment can not be empty")?;

        if self.post_repo.find_comment(&comment_id).await?.is_none() {
            return Err(error::SystemError::not_found("Comment not found"));
        }

        let from_name = self.display_name(&user_id).await?;
        self.post_repo
            .create_reply(&InsertReply {
                comment_id,
                user_id,
                comment,
                from_name,
                reply_at: body.reply_at,
            })
            .await?;

        self.get_comment(comment_id).await
    }

    /// Toggles a like on the comment, or on one of its replies when `reply_id` is given.
    pub async fn like_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        reply_id: Option<Uuid>,
    ) -> Result<CommentResponse, error::SystemError> {
        if self.post_repo.find_comment(&comment_id).await?.is_none() {
            return Err(error::SystemError::not_found("Comment not found"));
        }

        let target = match reply_id {
            Some(reply_id) => {
                self.reply_of(comment_id, reply_id).await?;
                LikeTarget::Reply(reply_id)
            }
            None => LikeTarget::Comment(comment_id),
        };

        self.toggle_like(target, user_id).await?;
        self.get_comment(comment_id).await
    }

    pub async fn edit_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> Result<CommentResponse, error::SystemError> {
        let text = non_blank(text, "Comment can not be empty")?;
        self.owned_comment(user_id, comment_id).await?;

        self.post_repo
            .update_comment(&comment_id, &text)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Comment not found"))?;

        self.get_comment(comment_id).await
    }

    pub async fn delete_comment(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let comment = self.owned_comment(user_id, comment_id).await?;

        if !self.post_repo.delete_comment(&comment_id).await? {
            return Err(error::SystemError::not_found("Comment not found"));
        }
        log::info!("Comment {} removed from post {}", comment_id, comment.post_id);
        Ok(())
    }

    pub async fn edit_reply(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        text: &str,
    ) -> Result<CommentResponse, error::SystemError> {
        let text = non_blank(text, "Comment can not be empty")?;
        self.owned_reply(user_id, comment_id, reply_id).await?;

        self.post_repo
            .update_reply(&reply_id, &text)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Reply not found"))?;

        self.get_comment(comment_id).await
    }

    pub async fn delete_reply(
        &self,
        user_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
    ) -> Result<CommentResponse, error::SystemError> {
        self.owned_reply(user_id, comment_id, reply_id).await?;
        if !self.post_repo.delete_reply(&reply_id).await? {
            return Err(error::SystemError::not_found("Reply not found"));
        }
        self.get_comment(comment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{modules::user::schema::UserEntity, test::MemoryStore};

    type Svc = PostService<MemoryStore, MemoryStore>;

    struct Fixture {
        svc: Svc,
        alice: UserEntity,
        bob: UserEntity,
        post: PostResponse,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::default();
        let alice = store.seed_user("Alice", "Smith");
        let bob = store.seed_user("Bob", "Jones");
        let store = Arc::new(store);
        let svc = PostService::with_dependencies(store.clone(), store);

        let post = svc
            .create_post(
                alice.id,
                CreatePostModel { description: "Hello world".into(), image: None },
            )
            .await
            .unwrap();

        Fixture { svc, alice, bob, post }
    }

    fn comment(text: &str) -> CommentModel {
        CommentModel { comment: text.into() }
    }

    #[actix_web::test]
    async fn liking_twice_toggles() {
        let Fixture { svc, bob, post, .. } = fixture().await;

        let liked = svc.like_post(bob.id, post.id).await.unwrap();
        assert_eq!(liked.likes, vec![bob.id]);

        let unliked = svc.like_post(bob.id, post.id).await.unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[actix_web::test]
    async fn only_owner_deletes_post() {
        let Fixture { svc, alice, bob, post } = fixture().await;

        let err = svc.delete_post(bob.id, post.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        svc.delete_post(alice.id, post.id).await.unwrap();
        assert!(matches!(
            svc.get_post(post.id).await.unwrap_err(),
            error::SystemError::NotFound(_)
        ));
    }

    #[actix_web::test]
    async fn comment_is_signed_with_author_name() {
        let Fixture { svc, bob, post, .. } = fixture().await;

        let created = svc.comment_post(bob.id, post.id, comment("Nice post")).await.unwrap();
        assert_eq!(created.from, "Bob Jones");
        assert_eq!(created.user.id, bob.id);
        assert_eq!(svc.get_post(post.id).await.unwrap().comment_count, 1);

        let err = svc.comment_post(bob.id, post.id, comment("   ")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc.comment_post(bob.id, Uuid::nil(), comment("hi")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn only_owner_edits_or_deletes_comment() {
        let Fixture { svc, alice, bob, post } = fixture().await;
        let created = svc.comment_post(bob.id, post.id, comment("first")).await.unwrap();

        let err = svc.edit_comment(alice.id, created.id, "hijacked").await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));
        let err = svc.delete_comment(alice.id, created.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let err = svc.edit_comment(bob.id, created.id, "  ").await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let edited = svc.edit_comment(bob.id, created.id, "edited").await.unwrap();
        assert_eq!(edited.comment, "edited");
    }

    #[actix_web::test]
    async fn deleting_a_comment_removes_exactly_one() {
        let Fixture { svc, alice, bob, post } = fixture().await;
        let first = svc.comment_post(bob.id, post.id, comment("one")).await.unwrap();
        let second = svc.comment_post(alice.id, post.id, comment("two")).await.unwrap();
        let third = svc.comment_post(bob.id, post.id, comment("three")).await.unwrap();

        svc.delete_comment(bob.id, first.id).await.unwrap();

        let remaining: Vec<Uuid> =
            svc.get_comments(post.id).await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![third.id, second.id]);
    }

    #[actix_web::test]
    async fn replies_are_nested_and_likeable() {
        let Fixture { svc, alice, bob, post } = fixture().await;
        let parent = svc.comment_post(bob.id, post.id, comment("question?")).await.unwrap();

        let thread = svc
            .reply_comment(
                alice.id,
                parent.id,
                ReplyModel { comment: "answer".into(), reply_at: Some(parent.from) },
            )
            .await
            .unwrap();
        assert_eq!(thread.replies.len(), 1);
        let reply = &thread.replies[0];
        assert_eq!(reply.reply_at.as_deref(), Some("Bob Jones"));

        let liked = svc.like_comment(bob.id, parent.id, Some(reply.id)).await.unwrap();
        assert_eq!(liked.replies[0].likes, vec![bob.id]);
        assert!(liked.likes.is_empty());

        let liked = svc.like_comment(bob.id, parent.id, None).await.unwrap();
        assert_eq!(liked.likes, vec![bob.id]);

        let comments = svc.get_comments(post.id).await.unwrap();
        assert_eq!(comments[0].replies[0].id, reply.id);
    }

    #[actix_web::test]
    async fn reply_must_belong_to_comment() {
        let Fixture { svc, alice, bob, post } = fixture().await;
        let a = svc.comment_post(bob.id, post.id, comment("a")).await.unwrap();
        let b = svc.comment_post(bob.id, post.id, comment("b")).await.unwrap();
        let thread = svc
            .reply_comment(alice.id, a.id, ReplyModel { comment: "r".into(), reply_at: None })
            .await
            .unwrap();
        let reply_id = thread.replies[0].id;

        let err = svc.like_comment(bob.id, b.id, Some(reply_id)).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        let err = svc.edit_reply(bob.id, a.id, reply_id, "mine now").await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let thread = svc.delete_reply(alice.id, a.id, reply_id).await.unwrap();
        assert!(thread.replies.is_empty());
    }

    #[actix_web::test]
    async fn delete_reports_reply_already_gone() {
        let store = MemoryStore::default();
        let alice = store.seed_user("Alice", "Smith");
        let store = Arc::new(store);
        let svc: Svc = PostService::with_dependencies(store.clone(), store.clone());
        let post = svc
            .create_post(alice.id, CreatePostModel { description: "hi".into(), image: None })
            .await
            .unwrap();
        let parent = svc.comment_post(alice.id, post.id, comment("a")).await.unwrap();
        let thread = svc
            .reply_comment(alice.id, parent.id, ReplyModel { comment: "r".into(), reply_at: None })
            .await
            .unwrap();
        let reply_id = thread.replies[0].id;

        store.vanish_reply(reply_id);
        let err = svc.delete_reply(alice.id, parent.id, reply_id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn feed_puts_own_and_friend_posts_first() {
        let store = MemoryStore::default();
        let alice = store.seed_user("Alice", "Smith");
        let bob = store.seed_user("Bob", "Jones");
        let carol = store.seed_user("Carol", "King");
        store.seed_friendship(alice.id, bob.id);
        let store = Arc::new(store);
        let svc: Svc = PostService::with_dependencies(store.clone(), store);

        let post = |text: &str| CreatePostModel { description: text.into(), image: None };
        let from_bob = svc.create_post(bob.id, post("bob's news")).await.unwrap();
        let from_carol = svc.create_post(carol.id, post("carol's news")).await.unwrap();
        let from_alice = svc.create_post(alice.id, post("alice's news")).await.unwrap();

        let feed: Vec<Uuid> =
            svc.get_posts(alice.id, None).await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(feed, vec![from_alice.id, from_bob.id, from_carol.id]);

        let filtered = svc.get_posts(alice.id, Some("CAROL".into())).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, from_carol.id);
    }
}
