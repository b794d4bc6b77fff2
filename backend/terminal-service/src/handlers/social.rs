/// Social feed handlers
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{parse_id, PageQuery};
use crate::services::social::{CommentRequest, CreatePostRequest};
use crate::services::SocialService;
use crate::state::AppState;

pub async fn feed(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = SocialService::new(&state).feed(&user, query.resolve()).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn user_posts(
    state: web::Data<AppState>,
    user: AuthUser,
    author: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let author = parse_id(&author)?;
    let page = SocialService::new(&state)
        .user_posts(&user, &author, query.resolve())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = SocialService::new(&state)
        .create(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn toggle_like(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let like = SocialService::new(&state).toggle_like(&user, &id).await?;
    Ok(HttpResponse::Ok().json(like))
}

pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let comment = SocialService::new(&state)
        .comment(&user, &id, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    SocialService::new(&state).delete(&user, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted" })))
}
