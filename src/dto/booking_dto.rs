use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

// Pasajero dentro de una solicitud de reserva
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassengerInput {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(range(min = 1, max = 120))]
    pub age: i32,

    #[validate(custom = "crate::utils::validation::validate_gender")]
    pub gender: String,
}

// Request para crear una reserva
//
// `travel_date` llega como "YYYY-MM-DD" y se guarda tal cual, sin
// conversión de zona horaria. `seat_ids` son los ids de la tabla seats,
// no las etiquetas visibles.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,

    #[validate(range(min = 1))]
    pub bus_id: i32,

    #[validate(range(min = 1))]
    pub route_id: i32,

    #[validate(custom = "crate::utils::validation::validate_date_str")]
    pub travel_date: String,

    #[validate(custom = "crate::utils::validation::validate_fare")]
    pub total_fare: Decimal,

    #[validate(length(min = 1, message = "Debe seleccionar al menos un asiento"))]
    pub seat_ids: Vec<i32>,

    #[validate]
    pub passengers: Vec<PassengerInput>,
}
