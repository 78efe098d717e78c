use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, AppState, ServiceSettings},
    metrics,
    model::{LanguageDetector, LanguageTable},
    signals::setup_signal_handlers,
    storage::SqlitePredictionLog,
};

/// Request bodies above this size are rejected before deserialization
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the language detection server
///
/// This function:
/// 1. Initializes metrics
/// 2. Loads the scaler and classifier (fatal on failure)
/// 3. Opens the prediction log database and runs migrations
/// 4. Sets up signal handlers for graceful shutdown
/// 5. Serves requests until a shutdown signal arrives
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_route = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        let handle = metrics::init_metrics().context("Failed to install metrics recorder")?;
        Some((config.metrics.endpoint.clone(), Arc::new(handle)))
    } else {
        None
    };

    info!("Loading model artifacts...");
    let detector = LanguageDetector::load(
        &config.model.scaler_path,
        &config.model.classifier_path,
        LanguageTable::new(&config.languages),
    )
    .context("Failed to load model artifacts")?;

    let store = Arc::new(
        SqlitePredictionLog::open(&config.database.path, config.database.max_connections)
            .await
            .context("Failed to open prediction log database")?,
    );

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState::new(
        Some(Arc::new(detector)),
        store.clone(),
        ServiceSettings::from_config(&config),
    );
    let app = create_router(state, metrics_route);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid server host: {}", config.server.host))?,
        config.server.port,
    ));

    info!("Starting language detector on {}", addr);
    info!(
        "Configuration: {} languages, database {}, static dir {}",
        config.languages.len(),
        config.database.path,
        config.server.static_dir
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    store.close().await;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
///
/// `metrics` is the exposition path and recorder handle, when enabled.
pub fn create_router(
    state: AppState,
    metrics: Option<(String, Arc<PrometheusHandle>)>,
) -> Router {
    let static_files = ServeDir::new(&state.settings.static_dir);

    let mut app = Router::new()
        .route("/", get(handlers::index::serve_index))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/v1/predict", post(handlers::predict::predict_language))
        .route("/api/v1/logs", get(handlers::logs::get_logs))
        .nest_service("/static", static_files)
        .with_state(state);

    if let Some((endpoint, handle)) = metrics {
        app = app.merge(
            Router::new()
                .route(&endpoint, get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
