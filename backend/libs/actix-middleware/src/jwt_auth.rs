use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage,
};
use crypto_core::jwt::JwtManager;
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::json_error;

/// Identity extracted from a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User ObjectId as hex string
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
}

/// JWT Authentication Middleware
///
/// Rejects requests without a valid `Authorization: Bearer <token>` header
/// with 401 and stores an [`AuthUser`] in the request extensions otherwise.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    jwt: Arc<JwtManager>,
}

impl JwtAuthMiddleware {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    jwt: Arc<JwtManager>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let jwt = self.jwt.clone();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    json_error(StatusCode::UNAUTHORIZED, "Missing Authorization header")
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                json_error(
                    StatusCode::UNAUTHORIZED,
                    "Invalid Authorization header format",
                )
            })?;

            let token_data = jwt.validate(token).map_err(|e| {
                tracing::warn!(path = %req.path(), "JWT validation failed: {}", e);
                json_error(StatusCode::UNAUTHORIZED, "Invalid or expired token")
            })?;

            let claims = token_data.claims;
            req.extensions_mut().insert(AuthUser {
                user_id: claims.sub,
                username: claims.username,
                is_admin: claims.is_admin,
            });

            service.call(req).await
        })
    }
}

/// FromRequest implementation for AuthUser
impl actix_web::FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(json_error(
                StatusCode::UNAUTHORIZED,
                "User not authenticated",
            ))),
        }
    }
}
