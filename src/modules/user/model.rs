use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::{modules::user::schema::UserEntity, utils::double_option};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterModel {
    #[validate(length(min = 1, message = "First Name is Required!"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last Name is Required!"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password length should be greater than 6 character"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is Required!"))]
    pub password: String,
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserModel {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profile_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub profession: Option<Option<String>>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linked_in: Option<String>,
}

impl UpdateUserModel {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.location.is_none()
            && self.profile_url.is_none()
            && self.profession.is_none()
            && self.instagram.is_none()
            && self.facebook.is_none()
            && self.linked_in.is_none()
    }
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = 100, message = "Search query is too long"))]
    pub q: String,
}

pub struct InsertUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hash_password: String,
}

pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<Option<String>>,
    pub profile_url: Option<Option<String>>,
    pub profession: Option<Option<String>>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linked_in: Option<String>,
}

impl From<UpdateUserModel> for UpdateUser {
    fn from(model: UpdateUserModel) -> Self {
        UpdateUser {
            first_name: model.first_name,
            last_name: model.last_name,
            location: model.location,
            profile_url: model.profile_url,
            profession: model.profession,
            instagram: model.instagram,
            facebook: model.facebook,
            linked_in: model.linked_in,
        }
    }
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Author card embedded in posts, comments, friend lists and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
    pub location: Option<String>,
}

impl From<&UserEntity> for UserSummary {
    fn from(user: &UserEntity) -> Self {
        UserSummary {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_url: user.profile_url.clone(),
            profession: user.profession.clone(),
            location: user.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: Option<String>,
    pub profile_url: Option<String>,
    pub profession: Option<String>,
    pub instagram: String,
    pub facebook: String,
    pub linked_in: String,
    pub friends: Vec<UserSummary>,
    pub verified: bool,
    pub views: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserResponse {
    pub fn new(entity: UserEntity, friends: Vec<UserSummary>) -> Self {
        UserResponse {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            location: entity.location,
            profile_url: entity.profile_url,
            profession: entity.profession,
            instagram: entity.instagram,
            facebook: entity.facebook,
            linked_in: entity.linked_in,
            friends,
            verified: entity.verified,
            views: entity.views,
            created_at: entity.created_at,
        }
    }
}
