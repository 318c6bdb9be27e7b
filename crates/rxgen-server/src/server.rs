use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, web, App, HttpServer};
use rxgen_core::{QueryStore, SqliteStore};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::TracingMiddleware;
use crate::state::AppState;

pub const MAX_JSON_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/generate", web::post().to(handlers::generate::handler))
            .route("/generate-regex", web::post().to(handlers::generate::handler))
            .route("/profiles", web::post().to(handlers::profiles::create))
            .route("/profiles", web::get().to(handlers::profiles::list))
            .route("/profiles/{name}/logs", web::get().to(handlers::logs::list))
            .route(
                "/profiles/{name}/logs",
                web::delete().to(handlers::logs::delete_all),
            )
            .route(
                "/profiles/{name}/logs/{id}",
                web::delete().to(handlers::logs::delete_one),
            )
            .route("/health", web::get().to(handlers::health::handler)),
    );
}

/// Body limit plus mapping of unreadable JSON bodies to validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY_BYTES)
        .error_handler(|err, _req| match err {
            overflow @ (JsonPayloadError::Overflow { .. }
            | JsonPayloadError::OverflowKnownLength { .. }) => overflow.into(),
            other => AppError::Validation(format!("Invalid request body: {other}")).into(),
        })
}

pub async fn run_server(config: AppConfig) -> io::Result<()> {
    tracing::info!("Initializing server with config: {:?}", config);

    let store = SqliteStore::new(&config.database_path);
    store.init().await.map_err(|e| {
        tracing::error!("Failed to init storage at {:?}: {}", store.path(), e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    tracing::info!("Storage initialized at {:?}", store.path());

    let backend = config.backend();
    if backend.is_configured() {
        tracing::info!("Generation backend: Gemini, model '{}'", config.model);
    } else {
        tracing::warn!("GEMINI_API_KEY/GOOGLE_API_KEY not set. Generation requests will fail.");
    }
    if config.master_pass.is_none() {
        tracing::warn!("MASTER_PASS not set. Profile creation is disabled.");
    }

    let store: Arc<dyn QueryStore> = Arc::new(store);
    let state = web::Data::new(AppState::new(&config, backend, store));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingMiddleware)
            .configure(app_config)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    tracing::info!("Server listening on http://{}:{}", config.host, config.port);

    server.await
}
