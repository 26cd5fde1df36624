use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    configs::{Cache, CacheExt},
    constants::{PROFILE_CACHE_TTL, SEARCH_LIMIT, VERIFICATION_TOKEN_TTL},
    modules::user::{
        model::{
            InsertUser, LoginModel, RegisterModel, UpdateUserModel, UserResponse, UserSummary,
        },
        repository::UserRepository,
    },
    utils::{generate_token, hash_password, verify_password, Claims, TypeClaims},
    ENV,
};

fn profile_key(id: &Uuid) -> String {
    format!("user:{id}")
}

fn verification_key(id: &Uuid) -> String {
    format!("verify:{id}")
}

fn refresh_key(jti: &Uuid) -> String {
    format!("refresh_token:{jti}")
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<dyn Cache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    async fn load_profile(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = profile_key(&id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }

        let entity = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        let friends = self.repo.find_friends(&id).await?;

        let user = UserResponse::new(entity, friends);
        self.cache.set(&key, &user, PROFILE_CACHE_TTL).await?;
        info!("User {} cached", id);
        Ok(user)
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.load_profile(id).await
    }

    /// Viewing someone else's profile counts as a view.
    pub async fn get_user(&self, viewer: Uuid, id: Uuid) -> Result<UserResponse, error::SystemError> {
        if viewer == id {
            return self.load_profile(id).await;
        }

        if self.repo.find_by_id(&id).await?.is_none() {
            return Err(error::SystemError::not_found("User not found"));
        }
        self.repo.increment_views(&id).await?;
        self.invalidate(&id).await?;
        self.load_profile(id).await
    }

    pub async fn invalidate(&self, id: &Uuid) -> Result<(), error::SystemError> {
        self.cache.delete(&profile_key(id)).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<UserResponse, error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let entity = self.repo.update(&id, &user.into()).await?;
        self.invalidate(&id).await?;

        let friends = self.repo.find_friends(&id).await?;
        Ok(UserResponse::new(entity, friends))
    }

    pub async fn register(&self, user: RegisterModel) -> Result<Uuid, error::SystemError> {
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(error::SystemError::conflict("uq_users_email"));
        }

        let hash_password = hash_password(&user.password)?;

        let created = self
            .repo
            .create(&InsertUser {
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                hash_password,
            })
            .await?;

        let token = generate_token(48);
        self.cache.set(&verification_key(&created.id), &token, VERIFICATION_TOKEN_TTL).await?;
        info!(
            "Verification link for {}: {}/api/users/verify/{}/{}",
            created.email, ENV.app_url, created.id, token
        );

        Ok(created.id)
    }

    pub async fn verify_email(&self, id: Uuid, token: &str) -> Result<(), error::SystemError> {
        let key = verification_key(&id);
        let expected: Option<String> = self.cache.get(&key).await?;

        match expected {
            Some(expected) if expected == token => {
                if !self.repo.set_verified(&id).await? {
                    return Err(error::SystemError::not_found("User not found"));
                }
                self.cache.delete(&key).await?;
                self.invalidate(&id).await?;
                info!("User {} verified email", id);
                Ok(())
            }
            _ => Err(error::SystemError::bad_request("Invalid or expired verification link")),
        }
    }

    fn issue_tokens(&self, id: &Uuid) -> Result<(String, String, Uuid), error::SystemError> {
        let access_token = Claims::new(id, ENV.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let refresh_token = Claims::new(id, ENV.refresh_token_expiration)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(ENV.jwt_secret.as_ref())?;

        Ok((access_token, refresh_token, jti))
    }

    pub async fn sign_in(
        &self,
        user: LoginModel,
    ) -> Result<(String, String, UserResponse), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid email or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid email or password"));
        }

        if !user_entity.verified {
            return Err(error::SystemError::forbidden(
                "User email is not verified. Check your email account and verify your email",
            ));
        }

        let (access_token, refresh_token, jti) = self.issue_tokens(&user_entity.id)?;
        self.cache
            .set(&refresh_key(&jti), &user_entity.id, ENV.refresh_token_expiration as usize)
            .await?;

        let friends = self.repo.find_friends(&user_entity.id).await?;
        Ok((access_token, refresh_token, UserResponse::new(user_entity, friends)))
    }

    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token =
            refresh_token.ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;

        let claims = Claims::decode(&token, ENV.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Refresh token invalid or expired"))?;

        let jti = match (claims._type, claims.jti) {
            (Some(TypeClaims::RefreshToken), Some(jti)) => jti,
            _ => return Err(error::SystemError::unauthorized("Refresh token invalid or expired")),
        };

        let owner: Option<Uuid> = self.cache.get(&refresh_key(&jti)).await?;
        if owner != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Refresh token revoked"));
        }
        self.cache.delete(&refresh_key(&jti)).await?;

        let (access_token, refresh_token, new_jti) = self.issue_tokens(&claims.sub)?;
        self.cache
            .set(&refresh_key(&new_jti), &claims.sub, ENV.refresh_token_expiration as usize)
            .await?;

        Ok((access_token, refresh_token))
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        if let Ok(Claims { jti: Some(jti), .. }) = Claims::decode(&token, ENV.jwt_secret.as_ref()) {
            self.cache.delete(&refresh_key(&jti)).await?;
        }
        Ok(())
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, error::SystemError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.repo.search_users(query, SEARCH_LIMIT).await
    }
}
