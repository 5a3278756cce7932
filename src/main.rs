use std::{env, time::Duration};

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use portfolio_codex::{
    constants::START_TIME,
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthGate,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

const LIMITER_EVICTION_EVERY: Duration = Duration::from_secs(10 * 60);
const LIMITER_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

fn init_tracing() {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let production = env::var("APP_ENV")
        .ok()
        .and_then(|raw| raw.parse::<AppEnvironment>().ok())
        == Some(AppEnvironment::Production);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if production {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }
    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    once_cell::sync::Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Database migrations applied");

    let app_state = match AppState::new(&config, pool) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to initialise storage client: {}", e);
            std::process::exit(1);
        }
    };

    if let (Some(email), Some(password)) = (&config.admin_bootstrap_email, &config.admin_bootstrap_password) {
        if let Err(e) = app_state.auth_handler.bootstrap_admin(email, password).await {
            tracing::error!("Failed to create bootstrap admin: {}", e);
        }
    }

    if !app_state.notifier.is_configured() {
        tracing::warn!("EMAIL_USER / EMAIL_PASS not set; notification emails are disabled");
    }

    tokio::spawn(
        app_state
            .submission_limiter
            .clone()
            .run_eviction(LIMITER_EVICTION_EVERY, LIMITER_IDLE_TTL),
    );

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Starting {} v{} on {} with {} workers",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.worker_count
    );

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthGate)
            .wrap(NormalizePath::trim())
            .wrap(cors(&server_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
