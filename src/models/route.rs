//! Modelo de Route
//!
//! Este módulo contiene el struct Route que mapea a la tabla routes.
//! Una ruta asocia un bus con un trayecto origen-destino y sus horarios.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Route - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i32,
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

/// Response de ruta para la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub id: i32,
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            bus_id: route.bus_id,
            origin: route.origin,
            destination: route.destination,
            departure_time: route.departure_time,
            arrival_time: route.arrival_time,
            created_at: route.created_at,
        }
    }
}

/// Resultado de búsqueda de buses: ruta + datos del bus que la sirve
///
/// `available_seats` solo se rellena cuando la búsqueda incluye fecha.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteSearchResult {
    pub route_id: i32,
    pub bus_id: i32,
    pub bus_name: String,
    pub bus_number: String,
    pub bus_type: String,
    pub fare: rust_decimal::Decimal,
    pub total_seats: i32,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    #[sqlx(default)]
    pub available_seats: Option<i32>,
}
