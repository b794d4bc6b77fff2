/// Auth handlers - register, login, session and OAuth redirects
use actix_middleware::AuthUser;
use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::models::UserResponse;
use crate::services::auth::{LoginRequest, RegisterRequest};
use crate::services::oauth::{frontend_error_url, OAuthProvider};
use crate::services::{AuthService, OAuthService, UserService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user declined consent
    pub error: Option<String>,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let auth = AuthService::new(&state).register(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(auth))
}

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let auth = AuthService::new(&state).login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth))
}

pub async fn me(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse> {
    let current = UserService::new(&state).current(&user).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(current)))
}

/// Tokens are stateless; logout only clears the CSRF cookie
pub async fn logout(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    tracing::info!(user_id = %user.user_id, "User logged out");
    HttpResponse::Ok()
        .cookie(state.config.csrf.removal_cookie())
        .json(serde_json::json!({ "message": "Logged out" }))
}

pub async fn oauth_start(
    state: web::Data<AppState>,
    provider: web::Path<String>,
) -> Result<HttpResponse> {
    let provider: OAuthProvider = provider.parse()?;
    let url = OAuthService::new(&state).authorization_url(provider)?;
    Ok(redirect(&url))
}

pub async fn oauth_callback(
    state: web::Data<AppState>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse> {
    let provider: OAuthProvider = provider.parse()?;
    let service = OAuthService::new(&state);

    if let Some(error) = query.error.as_deref() {
        tracing::warn!(provider = %provider, error, "OAuth provider returned an error");
        return Ok(redirect(&frontend_error_url(service.frontend_url(), error)));
    }

    let location = service
        .complete(provider, query.code.as_deref(), query.state.as_deref())
        .await?;
    Ok(redirect(&location))
}
