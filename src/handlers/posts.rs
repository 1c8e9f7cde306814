/// Post handlers - HTTP endpoints for post operations
///
/// Thin request/response conversion around `PostService`. Input shape rules
/// live on the DTOs; everything else is delegated.
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 10,
        max = 300,
        message = "Post must be between 10 and 300 characters"
    ))]
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 300, message = "Text field is required"))]
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Get all posts, newest first
pub async fn list_posts(service: web::Data<PostService>) -> Result<HttpResponse> {
    let posts = service.list_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post by id
pub async fn get_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get(*post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a post
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let req = req.into_inner();
    let post = service
        .create(user_id.0, req.text, req.name, req.avatar)
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Delete a post (owner only)
pub async fn delete_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    service.delete(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Like a post; responds with the updated likes sequence
pub async fn like_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let likes = service.like(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(likes))
}

/// Remove the caller's like; responds with the updated likes sequence
pub async fn unlike_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let likes = service.unlike(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(likes))
}

/// Add a comment; responds with the full updated post
pub async fn add_comment(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let req = req.into_inner();
    let post = service
        .add_comment(*post_id, user_id.0, req.text, req.name, req.avatar)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Remove a comment; responds with the full updated post
pub async fn remove_comment(
    service: web::Data<PostService>,
    path: web::Path<(Uuid, Uuid)>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post = service.remove_comment(post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(post))
}
