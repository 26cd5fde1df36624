use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser, UserSummary},
        schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;
    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;
    async fn set_verified(&self, id: &Uuid) -> Result<bool, error::SystemError>;
    async fn increment_views(&self, id: &Uuid) -> Result<(), error::SystemError>;

    /// Search users by first, last or full name (case-insensitive, partial match)
    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError>;

    async fn find_friends(&self, user_id: &Uuid) -> Result<Vec<UserSummary>, error::SystemError>;

    /// Users that are neither `user_id` nor one of its friends
    async fn find_suggestions(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>, error::SystemError>;
}
