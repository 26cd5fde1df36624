use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::api::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friend_request_status", rename_all = "UPPERCASE")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Denied,
}

impl FriendRequestStatus {
    fn is_terminal(self) -> bool {
        !matches!(self, FriendRequestStatus::Pending)
    }

    /// `Pending` may move to `Accepted` or `Denied`; nothing leaves a terminal state.
    pub fn transition(self, next: FriendRequestStatus) -> Result<Self, error::SystemError> {
        if self.is_terminal() {
            return Err(error::SystemError::bad_request("Friend request already processed"));
        }
        match next {
            FriendRequestStatus::Pending => {
                Err(error::SystemError::bad_request("Status must be Accepted or Denied"))
            }
            next => Ok(next),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendEntity {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestEntity {
    pub id: Uuid,
    pub request_from: Uuid,
    pub request_to: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
