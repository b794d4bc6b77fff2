/// Configuration management for Terminal Service
///
/// Settings are layered, later sources overriding earlier ones:
/// 1. Built-in defaults (`config/defaults.toml`, embedded at compile time)
/// 2. Optional file named by `NEXA_CONFIG`
/// 3. Environment variables `NEXA__SECTION__KEY` (e.g. `NEXA__JWT__SECRET`)
///
/// The loaded [`Config`] is passed to the application explicitly; nothing
/// reads settings from a global.
use actix_middleware::CsrfConfig;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub csrf: CsrfConfig,
    pub cors: CorsConfig,
    pub cache: CacheConfig,
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub admin: AdminConfig,
    pub observability: ObservabilityConfig,
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub env: Environment,
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    Mongo,
    /// Process-local store, data is lost on restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub uri: String,
    pub name: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// In-process TTL cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached listing pages
    pub ttl_secs: u64,
    /// How often expired entries are purged
    pub check_period_secs: u64,
    pub oauth_state_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Callback URL registered with the provider
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    /// SPA origin that receives the token after a successful login
    pub frontend_url: String,
    #[serde(default)]
    pub google: Option<OAuthProviderConfig>,
    #[serde(default)]
    pub linkedin: Option<OAuthProviderConfig>,
}

/// Route groups mounted at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub documents: bool,
    pub investments: bool,
    pub news: bool,
    pub blogs: bool,
    pub social: bool,
    pub verification: bool,
    pub marketing: bool,
    pub contact: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            documents: true,
            investments: true,
            news: true,
            blogs: true,
            social: true,
            verification: true,
            marketing: true,
            contact: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Existing accounts promoted to admin at startup
    pub bootstrap_usernames: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// `RUST_LOG` style filter, used when `RUST_LOG` is unset
    pub log_level: String,
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from defaults, the optional `NEXA_CONFIG` file and
    /// `NEXA__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("NEXA_CONFIG").ok();
        Self::load_from(path.as_deref().map(Path::new))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            include_str!("../config/defaults.toml"),
            config::FileFormat::Toml,
        ));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NEXA")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .with_list_parse_key("csrf.exempt_paths")
                .with_list_parse_key("admin.bootstrap_usernames")
                .try_parsing(true),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.apply_environment();
        config.validate()?;
        Ok(config)
    }

    /// Defaults only, with the in-memory store. Used by tests.
    pub fn for_tests() -> Self {
        let mut config = Self::load_from(None).unwrap_or_else(|e| panic!("defaults: {e}"));
        config.database.driver = DatabaseDriver::Memory;
        config.jwt.secret = SecretString::from("test-secret-that-is-long-enough-0123456789");
        config
    }

    /// Production always sends the CSRF cookie with `Secure`
    fn apply_environment(&mut self) {
        if self.app.env.is_production() {
            self.csrf.secure_cookie = true;
        }
    }

    /// JWT secret length is enforced by `JwtManager::new` at startup
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt.ttl_hours <= 0 {
            return Err(config::ConfigError::Message(
                "jwt.ttl_hours must be positive".to_string(),
            ));
        }
        if self.cache.check_period_secs == 0 {
            return Err(config::ConfigError::Message(
                "cache.check_period_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
