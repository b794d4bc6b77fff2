use actix_cors::Cors;
use actix_middleware::{metrics, MetricsMiddleware, RequestLogging};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use terminal_service::config::{Config, CorsConfig, DatabaseDriver, ObservabilityConfig};
use terminal_service::db::{mongo::MongoStore, Repositories};
use terminal_service::routes;
use terminal_service::services::UserService;
use terminal_service::AppState;

fn init_tracing(cfg: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if cfg.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn cors(cfg: &CorsConfig) -> Cors {
    let mut cors = Cors::default();
    for origin in &cfg.allowed_origins {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

async fn repositories(config: &Config) -> anyhow::Result<Repositories> {
    match config.database.driver {
        DatabaseDriver::Mongo => {
            let store = MongoStore::connect(&config.database)
                .await
                .context("Failed to connect to MongoDB")?;
            store
                .ensure_indexes()
                .await
                .context("Failed to create MongoDB indexes")?;
            Ok(Repositories::from_store(Arc::new(store)))
        }
        DatabaseDriver::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Repositories::in_memory())
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // `.env` is optional outside development
    let _ = dotenvy::dotenv();

    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.observability);

    tracing::info!(
        env = ?config.app.env,
        driver = ?config.database.driver,
        jwt_key = %crypto_core::hash::fingerprint(config.jwt.secret.expose_secret().as_bytes()),
        "Starting {}",
        config.app.name
    );

    let repos = repositories(&config).await?;
    let bind_address = config.bind_address();
    let workers = config.app.workers;
    let bootstrap_admins = config.admin.bootstrap_usernames.clone();

    let state = AppState::new(config, repos)?;
    state.spawn_cache_purge();

    if !bootstrap_admins.is_empty() {
        let promoted = UserService::new(&state)
            .promote_bootstrap_admins(&bootstrap_admins)
            .await?;
        tracing::info!(promoted, "Bootstrap admins processed");
    }

    tracing::info!("Starting HTTP server at {}", bind_address);

    let server_state = state.clone();
    let mut server = HttpServer::new(move || {
        let state = server_state.clone();
        App::new()
            .wrap(RequestLogging)
            .wrap(MetricsMiddleware)
            .wrap(cors(&state.config.cors))
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(|cfg| routes::configure(cfg, &state))
            .default_service(web::to(routes::not_found))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?;

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server.run().await?;
    tracing::info!("Server stopped");
    Ok(())
}
