/// Shared application state handed to every handler through `web::Data`
use anyhow::Context;
use chrono::Duration as ChronoDuration;
use crypto_core::JwtManager;
use document_templates::TemplateRegistry;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::db::Repositories;
use crate::models::{ListingResponse, Paginated};
use crate::services::oauth::{HttpIdentityProvider, IdentityProvider, OAuthProvider};

pub type ListingCache = TtlCache<Paginated<ListingResponse>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtManager>,
    pub repos: Repositories,
    pub templates: Arc<TemplateRegistry>,
    /// Listing pages keyed by `{kind}:{category}:{search}:{page}:{limit}`
    pub listing_cache: Arc<ListingCache>,
    /// Outstanding OAuth `state` values
    pub oauth_states: Arc<TtlCache<OAuthProvider>>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> anyhow::Result<Self> {
        let jwt = JwtManager::new(
            config.jwt.secret.expose_secret(),
            ChronoDuration::hours(config.jwt.ttl_hours),
        )
        .context("Failed to initialize JWT manager")?;

        let listing_cache = TtlCache::new("listings", Duration::from_secs(config.cache.ttl_secs));
        let oauth_states = TtlCache::new(
            "oauth_state",
            Duration::from_secs(config.cache.oauth_state_ttl_secs),
        );

        Ok(Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            repos,
            templates: Arc::new(TemplateRegistry::with_builtin()),
            listing_cache: Arc::new(listing_cache),
            oauth_states: Arc::new(oauth_states),
            identity: Arc::new(HttpIdentityProvider::new()),
        })
    }

    /// Replace the OAuth identity provider (tests use a stub)
    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    /// Start the periodic purge of both TTL caches
    pub fn spawn_cache_purge(&self) {
        let period = Duration::from_secs(self.config.cache.check_period_secs);
        self.listing_cache.spawn_purge_task(period);
        self.oauth_states.spawn_purge_task(period);
    }
}
