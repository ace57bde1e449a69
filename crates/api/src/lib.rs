//! # TutorSync API
//!
//! The web server of the TutorSync scheduling service. It exposes teacher
//! calendars, regular schedules, bookings and absences, plus the two
//! availability queries built on top of them.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request parsing and response shaping
//! - **Services**: scheduling rules and the availability engine
//! - **Middleware**: error mapping
//! - **Config**: environment and scheduling policy
//!
//! The API uses Axum as the web framework. Storage sits behind the store
//! traits of `tutorsync-db`, backed by PostgreSQL or an in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Scheduling services and the availability engine
pub mod services;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tutorsync_db::Stores;

use services::ServiceContext;

/// Shared application state handed to every request handler.
pub struct ApiState {
    pub context: ServiceContext,
}

impl ApiState {
    pub fn new(context: ServiceContext) -> Arc<Self> {
        Arc::new(Self { context })
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over `level`
/// when set.
pub fn init_tracing(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::teacher::routes())
        .merge(routes::calendar::routes())
        .merge(routes::availability::routes())
        .merge(routes::booking::routes())
        .merge(routes::absence::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the HTTP server on top of `stores`.
///
/// Tracing must already be initialised, see [`init_tracing`].
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// let config = tutorsync_api::config::ApiConfig::from_env()?;
/// tutorsync_api::start_server(config, tutorsync_db::Stores::memory()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, stores: Stores) -> Result<()> {
    let state = ApiState::new(ServiceContext::with_system_clock(stores, config.policy));

    let app = app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
