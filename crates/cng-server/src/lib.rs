//! CNG Tracker Web Server
//!
//! Axum-based REST API for the CNG savings tracker. Exposes the three
//! presentation commands (compute and persist, delete, refresh history) plus
//! the aggregates, trend series, and export built on the history.
//!
//! - Restrictive CORS policy and security headers
//! - Input errors map to 400, storage failures to 503

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use cng_core::{Database, Tracker};

mod handlers;

/// Maximum accepted JSON request body (10 KB)
pub const MAX_BODY_SIZE: usize = 10 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub tracker: Tracker<Database>,
}

impl AppState {
    pub fn db(&self) -> &Database {
        self.tracker.ledger()
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        tracker: Tracker::new(db),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Engine only
        .route("/calculate", post(handlers::calculate))
        // Ledger
        .route(
            "/trips",
            get(handlers::list_trips).post(handlers::create_trip),
        )
        .route("/trips/delete", post(handlers::delete_trips))
        .route(
            "/trips/:id",
            get(handlers::get_trip).delete(handlers::delete_trip),
        )
        // Derived views
        .route("/summary", get(handlers::get_summary))
        .route("/history", get(handlers::get_history))
        .route("/trends", get(handlers::get_trends))
        .route("/trends/histogram", get(handlers::get_savings_histogram))
        .route("/export", get(handlers::export_trips_handler));

    let cors_methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(cors_methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(cors_methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' blob: data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Dashboard front end, if one is deployed alongside
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    match db.count_trips() {
        Ok(count) => info!(
            trips = count,
            path = %db.path(),
            encrypted = db.is_encrypted(),
            "Trip ledger ready"
        ),
        Err(e) => error!(error = %e, "Trip ledger not readable at startup"),
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Request failed");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Library errors carry their own user-facing meaning
        let (status, message) = match err.downcast_ref::<cng_core::Error>() {
            Some(cng_core::Error::InvalidInput(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            Some(e @ cng_core::Error::StorageUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        };

        Self {
            status,
            message,
            internal: Some(err),
        }
    }
}
