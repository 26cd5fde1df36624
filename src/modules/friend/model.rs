use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::{friend::schema::FriendRequestStatus, user::model::UserSummary};

#[derive(sqlx::FromRow)]
pub struct FriendRequestRow {
    pub req_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub request_from: UserSummary,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendRequestRow> for FriendRequestResponse {
    fn from(r: FriendRequestRow) -> Self {
        FriendRequestResponse {
            id: r.req_id,
            status: r.status,
            created_at: r.created_at,
            request_from: UserSummary {
                id: r.user_id,
                first_name: r.first_name,
                last_name: r.last_name,
                profile_url: r.profile_url,
                profession: r.profession,
                location: r.location,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub request_to: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequestBody {
    pub rid: Uuid,
    pub status: FriendRequestStatus,
}
