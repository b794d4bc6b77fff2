/// CSRF token issue
use actix_web::{web, HttpResponse};
use crypto_core::csrf::generate_token;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

/// Issue a fresh token in both the cookie and the body; the SPA echoes it in
/// the CSRF header on state-changing requests
pub async fn csrf_token(state: web::Data<AppState>) -> HttpResponse {
    let token = generate_token();
    HttpResponse::Ok()
        .cookie(state.config.csrf.build_cookie(token.clone()))
        .json(CsrfTokenResponse { csrf_token: token })
}
