/// Contact form handlers
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{parse_id, PageQuery};
use crate::services::contact::ContactRequest;
use crate::services::ContactService;
use crate::state::AppState;

pub async fn submit(
    state: web::Data<AppState>,
    req: web::Json<ContactRequest>,
) -> Result<HttpResponse> {
    let message = ContactService::new(&state).submit(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(message))
}

pub async fn list_messages(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = ContactService::new(&state)
        .list(&user, query.resolve())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn mark_handled(
    state: web::Data<AppState>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    ContactService::new(&state).mark_handled(&user, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Message marked as handled" })))
}
