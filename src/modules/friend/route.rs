use crate::modules::friend::handle::*;
use actix_web::web::ServiceConfig;

/// Mounted inside the `/users` scope.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(send_friend_request)
        .service(list_friend_requests)
        .service(respond_friend_request)
        .service(list_friends)
        .service(suggested_friends);
}
