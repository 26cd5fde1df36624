use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    constants::SUGGESTED_FRIENDS_LIMIT,
    modules::{
        friend::{
            model::FriendRequestResponse,
            repository::FriendRepo,
            schema::{FriendEntity, FriendRequestEntity, FriendRequestStatus},
        },
        user::{model::UserSummary, repository::UserRepository},
    },
};

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepo + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        log::info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    pub async fn get_friends(&self, user_id: Uuid) -> Result<Vec<UserSummary>, error::SystemError> {
        self.user_repo.find_friends(&user_id).await
    }

    pub async fn suggested_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserSummary>, error::SystemError> {
        self.user_repo.find_suggestions(&user_id, SUGGESTED_FRIENDS_LIMIT).await
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if self.user_repo.find_by_id(&receiver_id).await?.is_none() {
            return Err(error::SystemError::not_found("Receiver user not found"));
        }

        let (friends, requests): (Option<FriendEntity>, Option<FriendRequestEntity>) = tokio::try_join!(
            self.friend_repo.find_friendship(&sender_id, &receiver_id),
            self.friend_repo.find_pending_request(&sender_id, &receiver_id),
        )?;

        if friends.is_some() {
            return Err(error::SystemError::bad_request("Users are already friends"));
        }

        if requests.is_some() {
            return Err(error::SystemError::conflict("friend_requests_request"));
        }

        let friend_request =
            self.friend_repo.create_friend_request(&sender_id, &receiver_id).await?;

        log::info!("Friend request {} sent from {} to {}", friend_request.id, sender_id, receiver_id);
        Ok(friend_request)
    }

    pub async fn get_friend_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friend_repo.find_pending_to_user(&user_id).await
    }

    /// Accepts or denies a pending request addressed to `user_id` and returns the
    /// resolved request along with the requests still waiting on the user.
    pub async fn respond_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        status: FriendRequestStatus,
    ) -> Result<(FriendRequestEntity, Vec<FriendRequestResponse>), error::SystemError> {
        let request = self
            .friend_repo
            .find_friend_request_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.request_to != user_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to respond to this friend request",
            ));
        }

        let status = request.status.transition(status)?;

        let resolved = self
            .friend_repo
            .resolve_friend_request_atomic(&request_id, status)
            .await?
            .ok_or_else(|| error::SystemError::bad_request("Friend request already processed"))?;

        log::info!("Friend request {} resolved as {:?}", request_id, status);

        let pending = self.friend_repo.find_pending_to_user(&user_id).await?;
        Ok((resolved, pending))
    }
}
