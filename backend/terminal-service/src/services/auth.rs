/// Auth service - registration, login and token issue
use crypto_core::{password, JwtManager};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{AuthProvider, CompanyInfo, User, UserResponse};
use crate::state::AppState;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username pattern is valid"));

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        regex(
            path = *USERNAME_RE,
            message = "Username may only contain letters, digits, '_', '.' and '-'"
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: String,
    #[validate(nested)]
    pub company_info: Option<CompanyInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.repos.users.clone(),
            jwt: state.jwt.clone(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<AuthResponse> {
        let token = self
            .jwt
            .issue(&user.id.to_hex(), &user.username, user.is_admin)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse> {
        req.username = req.username.trim().to_string();
        req.email = req
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        req.validate()?;

        // Checked before hashing so a taken username answers quickly
        if self.users.find_user_by_username(&req.username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if let Some(email) = &req.email {
            if self
                .users
                .find_user_by_email(&normalize_email(email))
                .await?
                .is_some()
            {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }

        let hash = password::hash_password(&req.password)?;
        let mut user = User::new(&req.username, req.email.take(), AuthProvider::Local);
        user.password = Some(hash);
        if let Some(info) = req.company_info.take() {
            user.set_company_info(info);
        }

        self.users.insert_user(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        self.issue(&user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let identifier = req.username.trim();
        if identifier.is_empty() || req.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let mut user = None;
        if identifier.contains('@') {
            user = self
                .users
                .find_user_by_email(&normalize_email(identifier))
                .await?;
        }
        if user.is_none() {
            user = self.users.find_user_by_username(identifier).await?;
        }
        let user = user.ok_or_else(invalid)?;

        // Accounts created through OAuth have no password
        let hash = user.password.as_deref().ok_or_else(invalid)?;
        password::verify_password(&req.password, hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue(&user)
    }

    /// Username derived from `seed` (e.g. an email local part) that is not
    /// taken yet: invalid characters are dropped, short names padded and a
    /// numeric suffix appended until unique
    pub async fn available_username(&self, seed: &str) -> Result<String> {
        let mut base: String = seed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
            .take(USERNAME_MAX - 6)
            .collect();
        if base.len() < USERNAME_MIN {
            base = format!("user{base}");
        }

        if self.users.find_user_by_username(&base).await?.is_none() {
            return Ok(base);
        }
        for n in 1..10_000u32 {
            let candidate = format!("{base}{n}");
            if self.users.find_user_by_username(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(AppError::Conflict(
            "Could not derive an available username".to_string(),
        ))
    }
}
