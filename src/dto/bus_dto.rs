use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

// Request para crear un bus; los asientos "1".."total_seats" se generan
// en la misma transacción
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusRequest {
    #[validate(length(min = 2, max = 100))]
    pub bus_name: String,

    #[validate(regex = "crate::utils::validation::BUS_NUMBER_RE")]
    pub bus_number: String,

    #[validate(length(min = 2, max = 50))]
    pub bus_type: String,

    #[validate(custom = "crate::utils::validation::validate_fare")]
    pub fare: Decimal,

    #[validate(range(min = 1, max = 200))]
    pub total_seats: i32,
}

// Request para actualizar un bus; el número de asientos es fijo y no se
// puede modificar por aquí
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusRequest {
    #[validate(length(min = 2, max = 100))]
    pub bus_name: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub bus_type: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_fare")]
    pub fare: Option<Decimal>,

    pub is_active: Option<bool>,
}

// Query params para búsqueda de buses por trayecto
#[derive(Debug, Deserialize)]
pub struct BusSearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: Option<String>,
}

// Query params de consultas de asientos por fecha
#[derive(Debug, Deserialize)]
pub struct SeatAvailabilityQuery {
    pub date: String,
}
