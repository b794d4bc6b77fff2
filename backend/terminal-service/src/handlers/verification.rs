/// Company verification handlers
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{parse_id, PageQuery};
use crate::services::verification::{
    ApproveRequest, RejectRequest, SubmitVerificationRequest, VerificationQuery,
};
use crate::services::VerificationService;
use crate::state::AppState;

pub async fn submit(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<SubmitVerificationRequest>,
) -> Result<HttpResponse> {
    let request = VerificationService::new(&state)
        .submit(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(request))
}

pub async fn status(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let request = VerificationService::new(&state).status(&user).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn list(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<VerificationQuery>,
) -> Result<HttpResponse> {
    let status = query.status()?;
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let result = VerificationService::new(&state)
        .list(&user, status, page)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn approve(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
    req: Option<web::Json<ApproveRequest>>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let note = req.and_then(|r| r.into_inner().note);
    let request = VerificationService::new(&state)
        .approve(&user, &id, note)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn reject(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
    req: web::Json<RejectRequest>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let request = VerificationService::new(&state)
        .reject(&user, &id, req.into_inner().reason)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}
