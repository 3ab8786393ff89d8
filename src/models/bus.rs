//! Modelo de Bus
//!
//! Este módulo contiene los structs Bus y Seat que mapean a las tablas
//! buses y seats. Los asientos se generan al crear el bus y el conjunto
//! por bus es fijo desde entonces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bus - mapea exactamente a la tabla buses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bus {
    pub id: i32,
    pub bus_name: String,
    pub bus_number: String,
    pub bus_type: String,
    pub fare: Decimal,
    pub total_seats: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Seat - mapea exactamente a la tabla seats
///
/// `seat_number` es la etiqueta visible ("1", "12A"); la identidad real
/// del asiento es `id`, único dentro del bus.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seat {
    pub id: i32,
    pub bus_id: i32,
    pub seat_number: String,
}

/// Response de bus para la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusResponse {
    pub id: i32,
    pub bus_name: String,
    pub bus_number: String,
    pub bus_type: String,
    pub fare: Decimal,
    pub total_seats: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Bus> for BusResponse {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            bus_name: bus.bus_name,
            bus_number: bus.bus_number,
            bus_type: bus.bus_type,
            fare: bus.fare,
            total_seats: bus.total_seats,
            is_active: bus.is_active,
            created_at: bus.created_at,
        }
    }
}

/// Vista de un asiento junto con su estado de ocupación para una fecha
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat_id: i32,
    pub seat_number: String,
    pub is_booked: bool,
}

/// Referencia mínima a un asiento dentro de una response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatSummary {
    pub seat_id: i32,
    pub seat_number: String,
}

impl From<Seat> for SeatSummary {
    fn from(seat: Seat) -> Self {
        Self {
            seat_id: seat.id,
            seat_number: seat.seat_number,
        }
    }
}

/// Asientos libres de un bus para una fecha de viaje concreta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableSeatsResponse {
    pub bus_id: i32,
    pub travel_date: chrono::NaiveDate,
    pub total_seats: i32,
    pub booked_seats: i32,
    pub available_seats: Vec<SeatSummary>,
}
