/// User handlers - own profile and admin user management
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{parse_id, PageQuery};
use crate::services::users::{ChangePasswordRequest, SetAdminRequest, UpdateProfileRequest};
use crate::services::UserService;
use crate::state::AppState;

pub async fn get_profile(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let profile = UserService::new(&state).profile(&user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let profile = UserService::new(&state)
        .update_profile(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse> {
    UserService::new(&state)
        .change_password(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password updated" })))
}

pub async fn list_users(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = UserService::new(&state).list(&user, query.resolve()).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn set_admin(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
    req: web::Json<SetAdminRequest>,
) -> Result<HttpResponse> {
    let target = parse_id(&id)?;
    let updated = UserService::new(&state)
        .set_admin(&user, &target, req.is_admin)
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let target = parse_id(&id)?;
    UserService::new(&state).delete(&user, &target).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User deleted" })))
}
