use actix_web::{post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{FriendRequestBody, FriendRequestResponse, RespondRequestBody},
            repository_pg::FriendRepositoryPg,
            schema::{FriendRequestEntity, FriendRequestStatus},
            service::FriendService,
        },
        user::{model::UserSummary, repository_pg::UserRepositoryPg, service::UserService},
    },
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[post("/friend-request")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: web::Json<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let request = friend_service.send_friend_request(sender_id, body.request_to).await?;

    Ok(success::Success::created(Some(request)).message("Friend Request sent successfully"))
}

#[post("/get-friend-request")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_friend_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)))
}

#[post("/accept-request")]
pub async fn respond_friend_request(
    friend_service: web::Data<FriendSvc>,
    user_service: web::Data<UserService>,
    body: web::Json<RespondRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (resolved, pending) =
        friend_service.respond_friend_request(user_id, body.rid, body.status).await?;

    // cached profiles embed the friend list
    if resolved.status == FriendRequestStatus::Accepted {
        user_service.invalidate(&resolved.request_from).await?;
        user_service.invalidate(&resolved.request_to).await?;
    }

    let message = match resolved.status {
        FriendRequestStatus::Accepted => "Friend request accepted",
        _ => "Friend request denied",
    };
    Ok(success::Success::ok(Some(pending)).message(message))
}

#[post("/friends")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)))
}

#[post("/suggested-friends")]
pub async fn suggested_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let users = friend_service.suggested_friends(user_id).await?;

    Ok(success::Success::ok(Some(users)))
}
