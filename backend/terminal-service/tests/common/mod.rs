//! Shared helpers for the HTTP API tests
//!
//! Every test builds the full route table over the in-memory store. Users
//! are seeded straight into the repository with a freshly issued token, so
//! only the auth tests pay for password hashing.
#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::{header, header::HeaderMap, Method, StatusCode},
    test::{self, TestRequest},
    web::Bytes,
};
use serde_json::Value;

use terminal_service::config::Config;
use terminal_service::db::Repositories;
use terminal_service::models::{AuthProvider, CompanyInfo, User};
use terminal_service::AppState;

pub const CSRF_TOKEN: &str = "0123456789abcdef0123456789abcdef";
pub const STRONG_PASSWORD: &str = "Str0ng!Pass";

/// Build the application service for `state`
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| terminal_service::routes::configure(cfg, &$state))
                .default_service(actix_web::web::to(terminal_service::routes::not_found)),
        )
        .await
    };
}

pub fn test_state() -> AppState {
    state_with(Config::for_tests())
}

pub fn state_with(config: Config) -> AppState {
    AppState::new(config, Repositories::in_memory()).expect("build app state")
}

pub fn company_info() -> CompanyInfo {
    CompanyInfo {
        company_name: "Некса Солушнс ДООЕЛ".into(),
        address: "ул. Македонија 1, Скопје".into(),
        tax_number: "4030012345678".into(),
        manager: "Марија Петровска".into(),
        industry: "ИТ".into(),
        ..Default::default()
    }
}

/// Insert a user directly and issue a token for it
pub async fn seed_user(
    state: &AppState,
    username: &str,
    is_admin: bool,
    complete_profile: bool,
) -> (User, String) {
    let mut user = User::new(
        username,
        Some(format!("{username}@example.com")),
        AuthProvider::Local,
    );
    user.is_admin = is_admin;
    if complete_profile {
        user.set_company_info(company_info());
    }
    state
        .repos
        .users
        .insert_user(&user)
        .await
        .expect("seed user");
    let token = state
        .jwt
        .issue(&user.id.to_hex(), &user.username, is_admin)
        .expect("issue token");
    (user, token)
}

pub fn with_csrf(req: TestRequest) -> TestRequest {
    req.cookie(Cookie::new("csrf-token", CSRF_TOKEN))
        .insert_header(("X-CSRF-Token", CSRF_TOKEN))
}

/// Request with optional bearer token; state-changing methods carry a valid
/// CSRF cookie/header pair
pub fn api(method: Method, uri: &str, token: Option<&str>) -> TestRequest {
    let is_safe = method == Method::GET;
    let mut req = TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    if !is_safe {
        req = with_csrf(req);
    }
    req
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: header::HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Call the app; middleware rejections are rendered like the server would
pub async fn send<S, R, B>(app: &S, req: R) -> TestResponse
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = test::read_body(resp).await;
            TestResponse {
                status,
                headers,
                body,
            }
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            TestResponse {
                status,
                headers,
                body,
            }
        }
    }
}
