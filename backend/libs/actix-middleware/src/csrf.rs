//! CSRF double-submit cookie middleware
//!
//! State-changing requests (POST, PUT, PATCH, DELETE) must carry the token
//! both in the CSRF cookie and in the CSRF header, and the two copies must be
//! equal. Safe methods and exempt path prefixes pass through untouched.

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, StatusCode},
    Error,
};
use crypto_core::csrf::tokens_match;
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::json_error;

pub const DEFAULT_COOKIE_NAME: &str = "csrf-token";
pub const DEFAULT_HEADER_NAME: &str = "X-CSRF-Token";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    pub enabled: bool,
    pub cookie_name: String,
    pub header_name: String,
    /// Path prefixes that skip the check (e.g. login before a session exists)
    pub exempt_paths: Vec<String>,
    /// Mark the cookie `Secure` (production behind TLS)
    pub secure_cookie: bool,
    pub cookie_max_age_secs: i64,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            exempt_paths: vec![
                "/api/auth/login".to_string(),
                "/api/auth/register".to_string(),
            ],
            secure_cookie: false,
            cookie_max_age_secs: 86_400,
        }
    }
}

impl CsrfConfig {
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Cookie carrying a freshly issued token. Readable by scripts so the SPA
    /// can copy it into the header.
    pub fn build_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(self.cookie_name.clone(), token)
            .path("/")
            .http_only(false)
            .secure(self.secure_cookie)
            .same_site(SameSite::Strict)
            .max_age(CookieDuration::seconds(self.cookie_max_age_secs))
            .finish()
    }

    /// Expired cookie used to clear the token on logout
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.build_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Middleware enforcing the double-submit check
#[derive(Clone)]
pub struct CsrfMiddleware {
    config: Arc<CsrfConfig>,
}

impl CsrfMiddleware {
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CsrfMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct CsrfMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<CsrfConfig>,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if !config.enabled
                || !is_state_changing(req.method())
                || config.is_exempt(req.path())
            {
                return service.call(req).await;
            }

            let cookie_token = req
                .cookie(&config.cookie_name)
                .map(|c| c.value().to_string());
            let header_token = req
                .headers()
                .get(config.header_name.as_str())
                .and_then(|h| h.to_str().ok())
                .map(str::to_string);

            match (cookie_token, header_token) {
                (Some(cookie), Some(header)) if tokens_match(&cookie, &header) => {
                    service.call(req).await
                }
                (None, _) | (_, None) => {
                    tracing::warn!(method = %req.method(), path = %req.path(), "CSRF token missing");
                    Err(json_error(StatusCode::FORBIDDEN, "CSRF token missing"))
                }
                _ => {
                    tracing::warn!(method = %req.method(), path = %req.path(), "CSRF token mismatch");
                    Err(json_error(StatusCode::FORBIDDEN, "Invalid CSRF token"))
                }
            }
        })
    }
}
