use serde::Deserialize;
use validator::Validate;

// Request para crear una ruta; los horarios llegan como "HH:MM:SS" y se
// parsean en el controller
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(range(min = 1))]
    pub bus_id: i32,

    #[validate(length(min = 2, max = 100))]
    pub origin: String,

    #[validate(length(min = 2, max = 100))]
    pub destination: String,

    #[validate(custom = "crate::utils::validation::validate_time_str")]
    pub departure_time: String,

    #[validate(custom = "crate::utils::validation::validate_time_str")]
    pub arrival_time: String,
}

// Request para actualizar una ruta existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub origin: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub destination: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_time_str")]
    pub departure_time: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_time_str")]
    pub arrival_time: Option<String>,
}
