//! Modelo de Booking
//!
//! Este módulo contiene los structs Booking, Passenger y BookingSeat que
//! mapean a las tablas bookings, passengers y booking_seats. Una reserva
//! agrupa pasajeros y asientos para un bus y una fecha de viaje.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estados posibles de una reserva
///
/// En la base de datos el estado se guarda como texto y las comparaciones
/// son case-insensitive: "cancelled", "Cancelled" y "CANCELLED" son el
/// mismo estado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// Parsear desde texto sin distinguir mayúsculas
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("confirmed") {
            Some(BookingStatus::Confirmed)
        } else if value.eq_ignore_ascii_case("cancelled") {
            Some(BookingStatus::Cancelled)
        } else {
            None
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub bus_id: i32,
    pub route_id: i32,
    pub travel_date: NaiveDate,
    pub total_fare: Decimal,
    pub status: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Verificar si la reserva está cancelada (comparación case-insensitive)
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case(BookingStatus::Cancelled.as_str())
    }
}

/// Passenger - mapea exactamente a la tabla passengers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Passenger {
    pub id: i32,
    pub booking_id: i32,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
}

/// BookingSeat - mapea exactamente a la tabla booking_seats
///
/// Liga un asiento físico a una reserva. `bus_id` se guarda denormalizado
/// para poder consultar ocupación por bus y fecha sin joins adicionales.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingSeat {
    pub id: i32,
    pub booking_id: i32,
    pub seat_id: i32,
    pub bus_id: i32,
}

/// Resultado de confirmar una reserva: id asignado + asientos ligados
#[derive(Debug, Clone, Serialize)]
pub struct BookingCreatedResponse {
    pub booking_id: i32,
    pub status: String,
    pub travel_date: NaiveDate,
    pub total_fare: Decimal,
    pub seat_ids: Vec<i32>,
    pub seat_numbers: Vec<String>,
}

/// Resultado de una cancelación
///
/// Cancelar una reserva ya cancelada es un no-op válido, no un error.
#[derive(Debug, Clone)]
pub enum CancellationOutcome {
    Cancelled(Booking),
    AlreadyCancelled(Booking),
}

/// Fila del join bookings + buses + routes usada por las proyecciones
#[derive(Debug, Clone, FromRow)]
pub struct BookingRecord {
    pub id: i32,
    pub user_id: i32,
    pub bus_id: i32,
    pub route_id: i32,
    pub travel_date: NaiveDate,
    pub total_fare: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub bus_name: String,
    pub bus_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
}

/// Pasajero dentro de una respuesta de reserva
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerResponse {
    pub full_name: String,
    pub age: i32,
    pub gender: String,
}

impl From<Passenger> for PassengerResponse {
    fn from(passenger: Passenger) -> Self {
        Self {
            full_name: passenger.full_name,
            age: passenger.age,
            gender: passenger.gender,
        }
    }
}

/// Response completa de una reserva: cabecera + viaje + asientos + pasajeros
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: i32,
    pub user_id: i32,
    pub bus_id: i32,
    pub route_id: i32,
    pub bus_name: String,
    pub bus_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub travel_date: NaiveDate,
    pub seat_numbers: Vec<String>,
    pub passengers: Vec<PassengerResponse>,
    pub total_fare: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Ensamblar la response a partir de la fila del join y sus colecciones
    pub fn from_parts(
        record: BookingRecord,
        seat_numbers: Vec<String>,
        passengers: Vec<Passenger>,
    ) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            bus_id: record.bus_id,
            route_id: record.route_id,
            bus_name: record.bus_name,
            bus_number: record.bus_number,
            origin: record.origin,
            destination: record.destination,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
            travel_date: record.travel_date,
            seat_numbers,
            passengers: passengers.into_iter().map(PassengerResponse::from).collect(),
            total_fare: record.total_fare,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// Fila del join de detalle de billete: reserva + viaje + titular
#[derive(Debug, Clone, FromRow)]
pub struct TicketRecord {
    pub id: i32,
    pub user_id: i32,
    pub bus_id: i32,
    pub route_id: i32,
    pub travel_date: NaiveDate,
    pub total_fare: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub bus_name: String,
    pub bus_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub user_name: String,
    pub user_email: String,
}

/// Detalle de billete para el titular de la reserva
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketResponse {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub bus_id: i32,
    pub route_id: i32,
    pub bus_name: String,
    pub bus_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub travel_date: NaiveDate,
    pub seat_numbers: Vec<String>,
    pub passengers: Vec<PassengerResponse>,
    pub total_fare: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TicketResponse {
    pub fn from_parts(
        record: TicketRecord,
        seat_numbers: Vec<String>,
        passengers: Vec<Passenger>,
    ) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            user_name: record.user_name,
            user_email: record.user_email,
            bus_id: record.bus_id,
            route_id: record.route_id,
            bus_name: record.bus_name,
            bus_number: record.bus_number,
            origin: record.origin,
            destination: record.destination,
            departure_time: record.departure_time,
            arrival_time: record.arrival_time,
            travel_date: record.travel_date,
            seat_numbers,
            passengers: passengers.into_iter().map(PassengerResponse::from).collect(),
            total_fare: record.total_fare,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_parse_case_insensitive() {
        assert_eq!(BookingStatus::parse("confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("CANCELLED"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("Cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("pending"), None);
    }

    #[test]
    fn test_booking_status_as_str() {
        assert_eq!(BookingStatus::Confirmed.as_str(), "Confirmed");
        assert_eq!(BookingStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn test_booking_is_cancelled() {
        let mut booking = Booking {
            id: 1,
            user_id: 1,
            bus_id: 1,
            route_id: 1,
            travel_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_fare: Decimal::new(4500, 2),
            status: "Confirmed".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!booking.is_cancelled());

        booking.status = "cancelled".to_string();
        assert!(booking.is_cancelled());

        booking.status = "CANCELLED".to_string();
        assert!(booking.is_cancelled());
    }
}
