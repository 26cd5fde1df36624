//! In-memory stand-ins for Postgres and Redis used by the service tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, LazyLock, Mutex, MutexGuard, Once},
};

use uuid::Uuid;

use crate::{
    api::error,
    configs::Cache,
    modules::{
        friend::{
            model::FriendRequestResponse,
            repository::{FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{FriendEntity, FriendRequestEntity, FriendRequestStatus},
        },
        post::{
            model::{CommentRow, InsertComment, InsertPost, InsertReply, PostRow, ReplyRow},
            repository::{CommentRepository, LikeRepository, PostRepository, ReplyRepository},
            schema::{CommentEntity, LikeTarget, PostEntity, ReplyEntity},
        },
        user::{
            model::{InsertUser, UpdateUser, UserSummary},
            repository::UserRepository,
            schema::UserEntity,
        },
    },
    utils::hash_password,
    ENV,
};

static INIT: Once = Once::new();

pub fn init_env() {
    INIT.call_once(|| {
        std::env::set_var("SECRET_KEY", "test-secret-key");
        std::env::set_var("DATABASE_URL", "postgres://localhost/friendsy_test");
        std::env::set_var("REDIS_URL", "redis://localhost:6379");
        std::env::set_var("ACCESS_TOKEN_EXPIRATION", "900");
        std::env::set_var("REFRESH_TOKEN_EXPIRATION", "3600");
    });
    LazyLock::force(&ENV);
}

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl Cache for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        Ok(self.entries.lock().map_err(|_| poisoned())?.get(key).cloned())
    }

    async fn set_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        _expiration: usize,
    ) -> Result<(), error::SystemError> {
        self.entries.lock().map_err(|_| poisoned())?.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), error::SystemError> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

fn poisoned() -> error::SystemError {
    error::SystemError::InternalError("memory store lock poisoned".into())
}

/// Tables kept in insertion order; "newest first" walks them backwards.
#[derive(Default)]
struct Tables {
    users: Vec<UserEntity>,
    friends: Vec<FriendEntity>,
    requests: Vec<FriendRequestEntity>,
    posts: Vec<PostEntity>,
    comments: Vec<CommentEntity>,
    replies: Vec<ReplyEntity>,
    likes: HashMap<LikeTarget, Vec<Uuid>>,
    /// Replies another request deletes between ownership check and delete.
    vanishing_replies: HashSet<Uuid>,
}

impl Tables {
    fn user(&self, id: &Uuid) -> Option<&UserEntity> {
        self.users.iter().find(|u| u.id == *id)
    }

    fn summary(&self, id: &Uuid) -> UserSummary {
        match self.user(id) {
            Some(user) => UserSummary::from(user),
            None => UserSummary {
                id: *id,
                first_name: String::new(),
                last_name: String::new(),
                profile_url: None,
                profession: None,
                location: None,
            },
        }
    }

    fn are_friends(&self, a: &Uuid, b: &Uuid) -> bool {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        self.friends.iter().any(|f| f.user_a == *a && f.user_b == *b)
    }

    fn likes(&self, target: LikeTarget) -> Vec<Uuid> {
        self.likes.get(&target).cloned().unwrap_or_default()
    }

    fn post_row(&self, post: &PostEntity) -> PostRow {
        let author = self.summary(&post.user_id);
        PostRow {
            id: post.id,
            user_id: post.user_id,
            description: post.description.clone(),
            image: post.image.clone(),
            created_at: post.created_at,
            author_first_name: author.first_name,
            author_last_name: author.last_name,
            author_profile_url: author.profile_url,
            author_profession: author.profession,
            author_location: author.location,
            likes: self.likes(LikeTarget::Post(post.id)),
            comment_count: self.comments.iter().filter(|c| c.post_id == post.id).count() as i64,
        }
    }

    fn comment_row(&self, comment: &CommentEntity) -> CommentRow {
        let author = self.summary(&comment.user_id);
        CommentRow {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            comment: comment.comment.clone(),
            from_name: comment.from_name.clone(),
            created_at: comment.created_at,
            author_first_name: author.first_name,
            author_last_name: author.last_name,
            author_profile_url: author.profile_url,
            author_profession: author.profession,
            author_location: author.location,
            likes: self.likes(LikeTarget::Comment(comment.id)),
        }
    }

    fn reply_row(&self, reply: &ReplyEntity) -> ReplyRow {
        let author = self.summary(&reply.user_id);
        ReplyRow {
            id: reply.id,
            comment_id: reply.comment_id,
            user_id: reply.user_id,
            comment: reply.comment.clone(),
            from_name: reply.from_name.clone(),
            reply_at: reply.reply_at.clone(),
            created_at: reply.created_at,
            author_first_name: author.first_name,
            author_last_name: author.last_name,
            author_profile_url: author.profile_url,
            author_profession: author.profession,
            author_location: author.location,
            likes: self.likes(LikeTarget::Reply(reply.id)),
        }
    }

    fn remove_replies_of(&mut self, comment_id: &Uuid) {
        let (gone, kept): (Vec<_>, Vec<_>) =
            self.replies.drain(..).partition(|r| r.comment_id == *comment_id);
        self.replies = kept;
        for reply in gone {
            self.likes.remove(&LikeTarget::Reply(reply.id));
        }
    }

    fn remove_comment(&mut self, comment_id: &Uuid) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != *comment_id);
        if self.comments.len() == before {
            return false;
        }
        self.remove_replies_of(comment_id);
        self.likes.remove(&LikeTarget::Comment(*comment_id));
        true
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, error::SystemError> {
        self.tables.lock().map_err(|_| poisoned())
    }

    /// Verified user with email `first.last@example.com` and password `password`.
    pub fn seed_user(&self, first_name: &str, last_name: &str) -> UserEntity {
        let user = UserEntity {
            id: new_id(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{first_name}.{last_name}@example.com").to_lowercase(),
            hash_password: hash_password("password").unwrap(),
            location: None,
            profile_url: None,
            profession: None,
            instagram: String::new(),
            facebook: String::new(),
            linked_in: String::new(),
            verified: true,
            views: 0,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn seed_friendship(&self, a: Uuid, b: Uuid) {
        let (user_a, user_b) = if a < b { (a, b) } else { (b, a) };
        self.lock().unwrap().friends.push(FriendEntity { user_a, user_b, created_at: now() });
    }

    /// The next delete of this reply finds it already gone.
    pub fn vanish_reply(&self, reply_id: Uuid) {
        self.lock().unwrap().vanishing_replies.insert(reply_id);
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock()?.user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let email = email.to_lowercase();
        Ok(self.lock()?.users.iter().find(|u| u.email.to_lowercase() == email).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut tables = self.lock()?;
        let email = user.email.to_lowercase();
        if tables.users.iter().any(|u| u.email.to_lowercase() == email) {
            return Err(error::SystemError::conflict("uq_users_email"));
        }

        let entity = UserEntity {
            id: new_id(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            location: None,
            profile_url: None,
            profession: None,
            instagram: String::new(),
            facebook: String::new(),
            linked_in: String::new(),
            verified: false,
            views: 0,
            created_at: now(),
            updated_at: now(),
        };
        tables.users.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut tables = self.lock()?;
        let entity = tables
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if let Some(v) = &user.first_name {
            entity.first_name = v.clone();
        }
        if let Some(v) = &user.last_name {
            entity.last_name = v.clone();
        }
        if let Some(v) = &user.location {
            entity.location = v.clone();
        }
        if let Some(v) = &user.profile_url {
            entity.profile_url = v.clone();
        }
        if let Some(v) = &user.profession {
            entity.profession = v.clone();
        }
        if let Some(v) = &user.instagram {
            entity.instagram = v.clone();
        }
        if let Some(v) = &user.facebook {
            entity.facebook = v.clone();
        }
        if let Some(v) = &user.linked_in {
            entity.linked_in = v.clone();
        }
        entity.updated_at = now();
        Ok(entity.clone())
    }

    async fn set_verified(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.lock()?;
        match tables.users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                user.verified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_views(&self, id: &Uuid) -> Result<(), error::SystemError> {
        if let Some(user) = self.lock()?.users.iter_mut().find(|u| u.id == *id) {
            user.views += 1;
        }
        Ok(())
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        let query = query.to_lowercase();
        let tables = self.lock()?;
        let mut found: Vec<&UserEntity> = tables
            .users
            .iter()
            .filter(|u| u.display_name().to_lowercase().contains(&query))
            .collect();
        found.sort_by(|a, b| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)));
        Ok(found.into_iter().take(limit as usize).map(UserSummary::from).collect())
    }

    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserSummary>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .friends
            .iter()
            .rev()
            .filter_map(|f| match (f.user_a == *user_id, f.user_b == *user_id) {
                (true, _) => Some(f.user_b),
                (_, true) => Some(f.user_a),
                _ => None,
            })
            .map(|id| tables.summary(&id))
            .collect())
    }

    async fn find_suggestions(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .rev()
            .filter(|u| u.id != *user_id && !tables.are_friends(user_id, &u.id))
            .take(limit as usize)
            .map(UserSummary::from)
            .collect())
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        let (a, b) = if user_id_a < user_id_b { (user_id_a, user_id_b) } else { (user_id_b, user_id_a) };
        Ok(self.lock()?.friends.iter().find(|f| f.user_a == *a && f.user_b == *b).cloned())
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn find_pending_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .lock()?
            .requests
            .iter()
            .find(|r| {
                r.status == FriendRequestStatus::Pending
                    && ((r.request_from == *user_id_a && r.request_to == *user_id_b)
                        || (r.request_from == *user_id_b && r.request_to == *user_id_a))
            })
            .cloned())
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self.lock()?.requests.iter().find(|r| r.id == *request_id).cloned())
    }

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .requests
            .iter()
            .rev()
            .filter(|r| r.request_to == *user_id && r.status == FriendRequestStatus::Pending)
            .map(|r| FriendRequestResponse {
                id: r.id,
                request_from: tables.summary(&r.request_from),
                status: r.status,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = FriendRequestEntity {
            id: new_id(),
            request_from: *sender_id,
            request_to: *receiver_id,
            status: FriendRequestStatus::Pending,
            created_at: now(),
            updated_at: now(),
        };
        self.lock()?.requests.push(request.clone());
        Ok(request)
    }
}

#[async_trait::async_trait]
impl FriendRepo for MemoryStore {
    async fn resolve_friend_request_atomic(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tables = self.lock()?;
        let Some(request) = tables
            .requests
            .iter_mut()
            .find(|r| r.id == *request_id && r.status == FriendRequestStatus::Pending)
        else {
            return Ok(None);
        };

        request.status = status;
        request.updated_at = now();
        let resolved = request.clone();

        if status == FriendRequestStatus::Accepted
            && !tables.are_friends(&resolved.request_from, &resolved.request_to)
        {
            let (user_a, user_b) = if resolved.request_from < resolved.request_to {
                (resolved.request_from, resolved.request_to)
            } else {
                (resolved.request_to, resolved.request_from)
            };
            tables.friends.push(FriendEntity { user_a, user_b, created_at: now() });
        }
        Ok(Some(resolved))
    }
}

#[async_trait::async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError> {
        let entity = PostEntity {
            id: new_id(),
            user_id: post.user_id,
            description: post.description.clone(),
            image: post.image.clone(),
            created_at: now(),
            updated_at: now(),
        };
        self.lock()?.posts.push(entity.clone());
        Ok(entity)
    }

    async fn find_post(&self, post_id: &Uuid) -> Result<Option<PostRow>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables.posts.iter().find(|p| p.id == *post_id).map(|p| tables.post_row(p)))
    }

    async fn find_feed(
        &self,
        user_id: &Uuid,
        search: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PostRow>, error::SystemError> {
        let tables = self.lock()?;
        let search = search.map(str::to_lowercase);
        let matching: Vec<&PostEntity> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| {
                search.as_ref().is_none_or(|s| p.description.to_lowercase().contains(s))
            })
            .collect();

        let (mut first, rest): (Vec<&PostEntity>, Vec<&PostEntity>) = matching
            .into_iter()
            .partition(|p| p.user_id == *user_id || tables.are_friends(user_id, &p.user_id));
        first.extend(rest);

        Ok(first.into_iter().take(limit as usize).map(|p| tables.post_row(p)).collect())
    }

    async fn find_posts_by_user(&self, user_id: &Uuid) -> Result<Vec<PostRow>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter(|p| p.user_id == *user_id)
            .map(|p| tables.post_row(p))
            .collect())
    }

    async fn search_posts(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<PostRow>, error::SystemError> {
        let query = query.to_lowercase();
        let tables = self.lock()?;
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter(|p| p.description.to_lowercase().contains(&query))
            .take(limit as usize)
            .map(|p| tables.post_row(p))
            .collect())
    }

    async fn delete_post(&self, post_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.lock()?;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != *post_id);
        if tables.posts.len() == before {
            return Ok(false);
        }

        let comment_ids: Vec<Uuid> =
            tables.comments.iter().filter(|c| c.post_id == *post_id).map(|c| c.id).collect();
        for id in comment_ids {
            tables.remove_comment(&id);
        }
        tables.likes.remove(&LikeTarget::Post(*post_id));
        Ok(true)
    }
}

#[async_trait::async_trait]
impl CommentRepository for MemoryStore {
    async fn find_comment(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        Ok(self.lock()?.comments.iter().find(|c| c.id == *comment_id).cloned())
    }

    async fn find_comment_detail(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<CommentRow>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables.comments.iter().find(|c| c.id == *comment_id).map(|c| tables.comment_row(c)))
    }

    async fn find_comments_by_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<CommentRow>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.post_id == *post_id)
            .map(|c| tables.comment_row(c))
            .collect())
    }

    async fn create_comment(
        &self,
        comment: &InsertComment,
    ) -> Result<CommentEntity, error::SystemError> {
        let entity = CommentEntity {
            id: new_id(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            comment: comment.comment.clone(),
            from_name: comment.from_name.clone(),
            created_at: now(),
            updated_at: now(),
        };
        self.lock()?.comments.push(entity.clone());
        Ok(entity)
    }

    async fn update_comment(
        &self,
        comment_id: &Uuid,
        comment: &str,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        let mut tables = self.lock()?;
        Ok(tables.comments.iter_mut().find(|c| c.id == *comment_id).map(|c| {
            c.comment = comment.to_string();
            c.updated_at = now();
            c.clone()
        }))
    }

    async fn delete_comment(&self, comment_id: &Uuid) -> Result<bool, error::SystemError> {
        Ok(self.lock()?.remove_comment(comment_id))
    }
}

#[async_trait::async_trait]
impl ReplyRepository for MemoryStore {
    async fn find_reply(&self, reply_id: &Uuid) -> Result<Option<ReplyEntity>, error::SystemError> {
        Ok(self.lock()?.replies.iter().find(|r| r.id == *reply_id).cloned())
    }

    async fn find_replies_by_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<Vec<ReplyRow>, error::SystemError> {
        let tables = self.lock()?;
        Ok(tables
            .replies
            .iter()
            .filter(|r| comment_ids.contains(&r.comment_id))
            .map(|r| tables.reply_row(r))
            .collect())
    }

    async fn create_reply(&self, reply: &InsertReply) -> Result<ReplyEntity, error::SystemError> {
        let entity = ReplyEntity {
            id: new_id(),
            comment_id: reply.comment_id,
            user_id: reply.user_id,
            comment: reply.comment.clone(),
            from_name: reply.from_name.clone(),
            reply_at: reply.reply_at.clone(),
            created_at: now(),
            updated_at: now(),
        };
        self.lock()?.replies.push(entity.clone());
        Ok(entity)
    }

    async fn update_reply(
        &self,
        reply_id: &Uuid,
        comment: &str,
    ) -> Result<Option<ReplyEntity>, error::SystemError> {
        let mut tables = self.lock()?;
        Ok(tables.replies.iter_mut().find(|r| r.id == *reply_id).map(|r| {
            r.comment = comment.to_string();
            r.updated_at = now();
            r.clone()
        }))
    }

    async fn delete_reply(&self, reply_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.lock()?;
        let before = tables.replies.len();
        tables.replies.retain(|r| r.id != *reply_id);
        tables.likes.remove(&LikeTarget::Reply(*reply_id));
        if tables.vanishing_replies.remove(reply_id) {
            return Ok(false);
        }
        Ok(tables.replies.len() != before)
    }
}

#[async_trait::async_trait]
impl LikeRepository for MemoryStore {
    async fn find_likes(&self, target: &LikeTarget) -> Result<Vec<Uuid>, error::SystemError> {
        Ok(self.lock()?.likes(*target))
    }

    async fn add_like(
        &self,
        target: &LikeTarget,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let mut tables = self.lock()?;
        let likes = tables.likes.entry(*target).or_default();
        if !likes.contains(user_id) {
            likes.push(*user_id);
        }
        Ok(())
    }

    async fn remove_like(
        &self,
        target: &LikeTarget,
        user_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        if let Some(likes) = self.lock()?.likes.get_mut(target) {
            likes.retain(|id| id != user_id);
        }
        Ok(())
    }
}
