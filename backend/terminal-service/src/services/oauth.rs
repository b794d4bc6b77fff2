/// OAuth login (Google, LinkedIn)
///
/// Flow: `authorization_url` stores a random `state` in the TTL cache and
/// returns the provider's consent URL. The callback consumes the state,
/// exchanges the code for a profile through an [`IdentityProvider`], finds
/// or creates the local user and redirects to the SPA with a token.
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::{Config, OAuthConfig, OAuthProviderConfig};
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::user::normalize_email;
use crate::models::{AuthProvider, User};
use crate::services::AuthService;
use crate::state::AppState;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const LINKEDIN_AUTH_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const LINKEDIN_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const LINKEDIN_USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Linkedin,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Linkedin => "linkedin",
        }
    }

    fn scope(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "openid email profile",
            OAuthProvider::Linkedin => "openid profile email",
        }
    }

    fn endpoints(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            OAuthProvider::Google => (GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL),
            OAuthProvider::Linkedin => {
                (LINKEDIN_AUTH_URL, LINKEDIN_TOKEN_URL, LINKEDIN_USERINFO_URL)
            }
        }
    }

    fn auth_provider(&self) -> AuthProvider {
        match self {
            OAuthProvider::Google => AuthProvider::Google,
            OAuthProvider::Linkedin => AuthProvider::Linkedin,
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "linkedin" => Ok(OAuthProvider::Linkedin),
            other => Err(AppError::NotFound(format!(
                "Unknown OAuth provider: {other}"
            ))),
        }
    }
}

/// Profile returned by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub email: String,
    /// The provider asserts the user controls `email`
    pub email_verified: bool,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code and fetch the signed-in profile
    async fn fetch_profile(
        &self,
        provider: OAuthProvider,
        config: &OAuthProviderConfig,
        code: &str,
    ) -> Result<OAuthProfile>;
}

/// Talks to the real providers over HTTPS
pub struct HttpIdentityProvider {
    http: Client,
}

impl HttpIdentityProvider {
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }
}

impl Default for HttpIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Both providers answer with OpenID Connect userinfo claims
#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn fetch_profile(
        &self,
        provider: OAuthProvider,
        config: &OAuthProviderConfig,
        code: &str,
    ) -> Result<OAuthProfile> {
        let (_, token_url, userinfo_url) = provider.endpoints();

        let mut params = HashMap::new();
        params.insert("code", code.to_string());
        params.insert("client_id", config.client_id.clone());
        params.insert(
            "client_secret",
            config.client_secret.expose_secret().to_string(),
        );
        params.insert("redirect_uri", config.redirect_uri.clone());
        params.insert("grant_type", "authorization_code".to_string());

        let token_resp = self.http.post(token_url).form(&params).send().await?;
        if !token_resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{provider} token request failed with status {}",
                token_resp.status()
            )));
        }
        let token: TokenResponse = token_resp.json().await?;

        let user_resp = self
            .http
            .get(userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !user_resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{provider} userinfo failed with status {}",
                user_resp.status()
            )));
        }
        let info: UserInfo = user_resp.json().await?;

        let email = info
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AppError::Upstream(format!("{provider} profile has no email")))?;

        Ok(OAuthProfile {
            email,
            email_verified: info.email_verified,
            name: info.name,
        })
    }
}

/// Consent URL for `provider`
pub fn build_authorization_url(
    provider: OAuthProvider,
    config: &OAuthProviderConfig,
    state: &str,
) -> Result<String> {
    let (auth_url, _, _) = provider.endpoints();
    let mut url = Url::parse(auth_url)
        .map_err(|e| AppError::Internal(format!("Invalid authorization URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", provider.scope())
        .append_pair("state", state);
    Ok(url.to_string())
}

/// SPA URL receiving the token after a successful login
pub fn frontend_success_url(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/oauth/callback?token={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// SPA login page with an error code
pub fn frontend_error_url(frontend_url: &str, error: &str) -> String {
    format!(
        "{}/login?error={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(error)
    )
}

pub struct OAuthService {
    config: Arc<Config>,
    users: Arc<dyn UserRepository>,
    states: Arc<TtlCache<OAuthProvider>>,
    identity: Arc<dyn IdentityProvider>,
    auth: AuthService,
}

impl OAuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            users: state.repos.users.clone(),
            states: state.oauth_states.clone(),
            identity: state.identity.clone(),
            auth: AuthService::new(state),
        }
    }

    fn oauth(&self) -> &OAuthConfig {
        &self.config.oauth
    }

    fn provider_config(&self, provider: OAuthProvider) -> Result<&OAuthProviderConfig> {
        let config = match provider {
            OAuthProvider::Google => self.oauth().google.as_ref(),
            OAuthProvider::Linkedin => self.oauth().linkedin.as_ref(),
        };
        config.ok_or_else(|| {
            AppError::NotFound(format!("OAuth provider {provider} is not configured"))
        })
    }

    pub fn frontend_url(&self) -> &str {
        &self.oauth().frontend_url
    }

    /// Register a fresh `state` and return the provider consent URL
    pub fn authorization_url(&self, provider: OAuthProvider) -> Result<String> {
        let config = self.provider_config(provider)?;
        let state = crypto_core::csrf::generate_token();
        let url = build_authorization_url(provider, config, &state)?;
        self.states.insert(state, provider);
        Ok(url)
    }

    /// Finish the login and return the SPA redirect URL carrying the token
    pub async fn complete(
        &self,
        provider: OAuthProvider,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<String> {
        let config = self.provider_config(provider)?;

        let state = state
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing OAuth state".to_string()))?;
        match self.states.take(state) {
            Some(expected) if expected == provider => {}
            _ => {
                return Err(AppError::BadRequest(
                    "Invalid or expired OAuth state".to_string(),
                ))
            }
        }

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

        let profile = self.identity.fetch_profile(provider, config, code).await?;
        let user = self.find_or_create(provider, &profile).await?;
        let auth = self.auth.issue(&user)?;

        tracing::info!(user_id = %user.id, provider = %provider, "OAuth login completed");
        Ok(frontend_success_url(self.frontend_url(), &auth.token))
    }

    /// Accounts are keyed by email, so only provider-verified addresses
    /// may sign in or claim one
    async fn find_or_create(&self, provider: OAuthProvider, profile: &OAuthProfile) -> Result<User> {
        if !profile.email_verified {
            tracing::warn!(provider = %provider, "OAuth login with unverified email refused");
            return Err(AppError::Forbidden(format!(
                "{provider} email address is not verified"
            )));
        }
        let email = normalize_email(&profile.email);
        if let Some(user) = self.users.find_user_by_email(&email).await? {
            return Ok(user);
        }

        let local_part = email.split('@').next().unwrap_or_default();
        let username = self.auth.available_username(local_part).await?;
        let user = User::new(&username, Some(email), provider.auth_provider());
        self.users.insert_user(&user).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            provider = %provider,
            "User created from OAuth profile"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn provider_config() -> OAuthProviderConfig {
        OAuthProviderConfig {
            client_id: "client-123".into(),
            client_secret: SecretString::from("shh".to_string()),
            redirect_uri: "http://localhost:5000/api/auth/oauth/google/callback".into(),
        }
    }

    #[test]
    fn test_google_authorization_url() {
        let url = build_authorization_url(OAuthProvider::Google, &provider_config(), "st4te")
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("accounts.google.com"));

        let query: HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(query["client_id"], "client-123");
        assert_eq!(query["state"], "st4te");
        assert_eq!(query["response_type"], "code");
        assert_eq!(
            query["redirect_uri"],
            "http://localhost:5000/api/auth/oauth/google/callback"
        );
    }

    #[test]
    fn test_linkedin_authorization_url() {
        let url = build_authorization_url(OAuthProvider::Linkedin, &provider_config(), "s")
            .unwrap();
        assert!(url.starts_with(LINKEDIN_AUTH_URL));
        assert!(url.contains("scope=openid+profile+email"));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Google".parse::<OAuthProvider>().unwrap(), OAuthProvider::Google);
        assert_eq!(
            "linkedin".parse::<OAuthProvider>().unwrap(),
            OAuthProvider::Linkedin
        );
        assert!(matches!(
            "github".parse::<OAuthProvider>(),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_userinfo_email_verified_defaults_to_false() {
        let info: UserInfo =
            serde_json::from_str(r#"{"email":"a@example.com","name":"A"}"#).unwrap();
        assert!(!info.email_verified);

        let info: UserInfo =
            serde_json::from_str(r#"{"email":"a@example.com","email_verified":true}"#).unwrap();
        assert!(info.email_verified);
    }

    #[test]
    fn test_frontend_urls() {
        assert_eq!(
            frontend_success_url("http://localhost:3000/", "a.b+c"),
            "http://localhost:3000/oauth/callback?token=a.b%2Bc"
        );
        assert_eq!(
            frontend_error_url("http://localhost:3000", "access_denied"),
            "http://localhost:3000/login?error=access_denied"
        );
    }
}
