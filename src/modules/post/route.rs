use crate::modules::post::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(get_comments);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/posts")
            .service(get_posts)
            .service(create_post)
            .service(get_user_posts)
            .service(like_post)
            .service(like_comment)
            .service(like_reply)
            .service(comment_post)
            .service(reply_comment)
            .service(edit_comment)
            .service(delete_comment)
            .service(edit_reply)
            .service(delete_reply)
            .service(get_post)
            .service(delete_post),
    );
}
