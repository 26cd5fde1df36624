use actix_web::{
    cookie::{time, Cookie},
    get, post, put, web, HttpRequest,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        post::{handle::PostSvc, model::PostResponse},
        user::{
            model::{self, SearchQuery, UserSummary},
            service::UserService,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
    ENV,
};

const REFRESH_COOKIE: &str = "refresh_token";

fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ENV.refresh_token_expiration as i64))
        .finish()
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub users: Vec<UserSummary>,
    pub posts: Vec<PostResponse>,
}

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<model::RegisterResponse>, error::Error> {
    let id = user_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(model::RegisterResponse { id }))
        .message("A verification email has been sent to your account"))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::LoginResponse>, error::Error> {
    let (access_token, refresh_token, user) = user_service.sign_in(user_data.0).await?;
    let response = model::LoginResponse { access_token, user };

    Ok(success::Success::ok(Some(response))
        .message("Login successfully")
        .cookies(vec![refresh_cookie(refresh_token)]))
}

#[get("/logout")]
pub async fn logout(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;
    let cleared = Cookie::build(REFRESH_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish();

    Ok(success::Success::ok(None).message("Logged out").cookies(vec![cleared]))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::TokenResponse>, error::Error> {
    let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());
    let (access_token, refresh_token) = user_service.refresh(refresh_token).await?;

    Ok(success::Success::ok(Some(model::TokenResponse { access_token }))
        .message("Refresh successful")
        .cookies(vec![refresh_cookie(refresh_token)]))
}

#[get("/users/verify/{user_id}/{token}")]
pub async fn verify_email(
    user_service: web::Data<UserService>,
    path: web::Path<(Uuid, String)>,
) -> Result<success::Success<()>, error::Error> {
    let (user_id, token) = path.into_inner();
    user_service.verify_email(user_id, &token).await?;
    Ok(success::Success::ok(None).message("Email verified successfully"))
}

#[get("/users/search")]
pub async fn search(
    user_service: web::Data<UserService>,
    post_service: web::Data<PostSvc>,
    query: ValidatedQuery<SearchQuery>,
) -> Result<success::Success<SearchResponse>, error::Error> {
    let q = query.0.q;
    let (users, posts) =
        tokio::try_join!(user_service.search_users(&q), post_service.search_posts(&q))?;

    Ok(success::Success::ok(Some(SearchResponse { users, posts })))
}

#[post("/get-user")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_profile(id).await?;
    Ok(success::Success::ok(Some(user)))
}

#[post("/get-user/{id}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let viewer = get_claims(&req)?.sub;
    let user = user_service.get_user(viewer, user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(user)))
}

#[put("/update-user")]
pub async fn update_user(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::UpdateUserModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.update_user(id, user_data.0).await?;
    Ok(success::Success::ok(Some(user)).message("User updated successfully"))
}
