use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::FriendRequestResponse;
use crate::modules::friend::schema::{FriendEntity, FriendRequestEntity, FriendRequestStatus};

#[async_trait::async_trait]
pub trait FriendRepository {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    /// Pending request between the two users, in either direction.
    async fn find_pending_request(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn find_pending_to_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError>;

    async fn create_friend_request(
        &self,
        sender_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRepo: FriendRepository + FriendRequestRepository + Send + Sync {
    /// Moves a pending request to `status`, recording the friendship when accepted.
    /// Returns `None` when the request was no longer pending.
    async fn resolve_friend_request_atomic(
        &self,
        request_id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;
}
