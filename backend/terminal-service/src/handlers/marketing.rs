/// Newsletter handlers
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::PageQuery;
use crate::services::marketing::SubscribeRequest;
use crate::services::MarketingService;
use crate::state::AppState;

pub async fn subscribe(
    state: web::Data<AppState>,
    req: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    let subscription = MarketingService::new(&state)
        .subscribe(req.into_inner())
        .await?;
    let mut resp = if subscription.created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(resp.json(subscription.subscriber))
}

pub async fn unsubscribe(
    state: web::Data<AppState>,
    req: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    let subscriber = MarketingService::new(&state)
        .unsubscribe(&req.email)
        .await?;
    Ok(HttpResponse::Ok().json(subscriber))
}

pub async fn list_subscribers(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = MarketingService::new(&state)
        .list(&user, query.resolve())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
