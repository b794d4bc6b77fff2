/// Listing handlers shared by investments, news and blogs
///
/// The kind comes from the scope's `web::Data<ListingKind>`, so one set of
/// handlers serves all three collections.
use actix_middleware::AuthUser;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::models::{parse_id, ListingKind, PageQuery};
use crate::services::listings::{ListingQuery, ListingRequest};
use crate::services::ListingService;
use crate::state::AppState;

fn service(state: &AppState, kind: &ListingKind) -> ListingService {
    ListingService::new(state, *kind)
}

pub async fn list(
    state: web::Data<AppState>,
    kind: web::Data<ListingKind>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let result = service(&state, &kind).list(&query.filter(), page).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn get(
    state: web::Data<AppState>,
    kind: web::Data<ListingKind>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    Ok(HttpResponse::Ok().json(service(&state, &kind).get(&id).await?))
}

pub async fn create(
    state: web::Data<AppState>,
    kind: web::Data<ListingKind>,
    user: AuthUser,
    req: web::Json<ListingRequest>,
) -> Result<HttpResponse> {
    let listing = service(&state, &kind)
        .create(&user, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(listing))
}

pub async fn update(
    state: web::Data<AppState>,
    kind: web::Data<ListingKind>,
    user: AuthUser,
    id: web::Path<String>,
    req: web::Json<ListingRequest>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    let listing = service(&state, &kind)
        .update(&user, &id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn delete(
    state: web::Data<AppState>,
    kind: web::Data<ListingKind>,
    user: AuthUser,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_id(&id)?;
    service(&state, &kind).delete(&user, &id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("{} deleted", kind.label())
    })))
}
