use actix_web::{delete, get, patch, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        post::{
            model::{
                CommentModel, CommentResponse, CreatePostModel, DeletedResponse, EditCommentModel,
                FeedBody, PostResponse, ReplyModel,
            },
            service::PostService,
        },
    },
    utils::ValidatedJson,
};

#[cfg(not(test))]
pub type PostSvc = PostService<
    crate::modules::post::repository_pg::PostRepositoryPg,
    crate::modules::user::repository_pg::UserRepositoryPg,
>;

#[cfg(test)]
pub type PostSvc = PostService<crate::test::MemoryStore, crate::test::MemoryStore>;

#[post("/create-post")]
pub async fn create_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<CreatePostModel>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.create_post(user_id, body.0).await?;
    Ok(success::Success::created(Some(post)).message("Post created successfully"))
}

#[post("")]
pub async fn get_posts(
    post_service: web::Data<PostSvc>,
    body: Option<web::Json<FeedBody>>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let search = body.and_then(|b| b.into_inner().search);
    let posts = post_service.get_posts(user_id, search).await?;
    Ok(success::Success::ok(Some(posts)))
}

#[post("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
) -> Result<success::Success<PostResponse>, error::Error> {
    let post = post_service.get_post(post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(post)))
}

#[post("/get-user-post/{id}")]
pub async fn get_user_posts(
    post_service: web::Data<PostSvc>,
    user_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let posts = post_service.get_user_posts(user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(posts)))
}

#[delete("/{id:[0-9a-fA-F-]{36}}")]
pub async fn delete_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<DeletedResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let id = post_id.into_inner();
    post_service.delete_post(user_id, id).await?;
    Ok(success::Success::ok(Some(DeletedResponse { id })).message("Deleted successfully"))
}

#[post("/like/{id}")]
pub async fn like_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.like_post(user_id, post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(post)))
}

#[get("/posts/comments/{id}")]
pub async fn get_comments(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
) -> Result<success::Success<Vec<CommentResponse>>, error::Error> {
    let comments = post_service.get_comments(post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(comments)))
}

#[post("/comment/{id}")]
pub async fn comment_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<CommentModel>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comment = post_service.comment_post(user_id, post_id.into_inner(), body.0).await?;
    Ok(success::Success::created(Some(comment)))
}

#[post("/reply-comment/{id}")]
pub async fn reply_comment(
    post_service: web::Data<PostSvc>,
    comment_id: web::Path<Uuid>,
    body: ValidatedJson<ReplyModel>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comment = post_service.reply_comment(user_id, comment_id.into_inner(), body.0).await?;
    Ok(success::Success::created(Some(comment)))
}

#[post("/like-comment/{id}")]
pub async fn like_comment(
    post_service: web::Data<PostSvc>,
    comment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comment = post_service.like_comment(user_id, comment_id.into_inner(), None).await?;
    Ok(success::Success::ok(Some(comment)))
}

#[post("/like-comment/{id}/{reply_id}")]
pub async fn like_reply(
    post_service: web::Data<PostSvc>,
    path: web::Path<(Uuid, Uuid)>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (comment_id, reply_id) = path.into_inner();
    let comment = post_service.like_comment(user_id, comment_id, Some(reply_id)).await?;
    Ok(success::Success::ok(Some(comment)))
}

#[patch("/edit-comment/{id}")]
pub async fn edit_comment(
    post_service: web::Data<PostSvc>,
    comment_id: web::Path<Uuid>,
    body: ValidatedJson<EditCommentModel>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comment =
        post_service.edit_comment(user_id, comment_id.into_inner(), &body.0.comment).await?;
    Ok(success::Success::ok(Some(comment)).message("Comment updated successfully"))
}

#[delete("/delete-comment/{id}")]
pub async fn delete_comment(
    post_service: web::Data<PostSvc>,
    comment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<DeletedResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let id = comment_id.into_inner();
    post_service.delete_comment(user_id, id).await?;
    Ok(success::Success::ok(Some(DeletedResponse { id })).message("Comment deleted"))
}

#[patch("/edit-reply/{id}/{reply_id}")]
pub async fn edit_reply(
    post_service: web::Data<PostSvc>,
    path: web::Path<(Uuid, Uuid)>,
    body: ValidatedJson<EditCommentModel>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (comment_id, reply_id) = path.into_inner();
    let comment =
        post_service.edit_reply(user_id, comment_id, reply_id, &body.0.comment).await?;
    Ok(success::Success::ok(Some(comment)).message("Reply updated successfully"))
}

#[delete("/delete-reply/{id}/{reply_id}")]
pub async fn delete_reply(
    post_service: web::Data<PostSvc>,
    path: web::Path<(Uuid, Uuid)>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (comment_id, reply_id) = path.into_inner();
    let comment = post_service.delete_reply(user_id, comment_id, reply_id).await?;
    Ok(success::Success::ok(Some(comment)).message("Reply deleted"))
}
