use crate::modules::{friend, user::handle::*};
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/auth").service(register).service(login).service(refresh).service(logout))
        .service(verify_email)
        .service(search);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(get_profile)
            .service(get_user)
            .service(update_user)
            .configure(friend::route::configure),
    );
}
