//! API de reservas de asientos de bus
//!
//! Backend REST sobre PostgreSQL: flota, rutas, reservas con asignación
//! transaccional de asientos, cancelaciones y consultas de disponibilidad.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use crate::state::AppState;

/// Construir el router completo de la aplicación
///
/// Se usa tanto desde el binario como desde los tests de integración.
pub fn build_router(state: AppState) -> Router {
    // CORS: permisivo en desarrollo, orígenes explícitos en producción
    let cors = if state.config.is_production() && !state.config.cors_origins.is_empty() {
        cors_middleware_with_origins(&state.config.cors_origins)
    } else {
        cors_middleware()
    };

    let rate_limit_state = RateLimitState::new(&state.config);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/auth", routes::create_auth_router(state.clone()))
        .nest("/api/bus", routes::create_bus_router(state.clone()))
        .nest("/api/route", routes::create_route_router(state.clone()))
        .nest("/api/booking", routes::create_booking_router())
        .layer(axum::middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API de reservas de bus funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
