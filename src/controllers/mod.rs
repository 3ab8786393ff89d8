//! Lógica de negocio del API
//!
//! Cada controller valida la entrada, orquesta los repositorios y arma la
//! response. Los handlers de rutas son envoltorios finos sobre esta capa.

pub mod auth_controller;
pub mod booking_controller;
pub mod bus_controller;
pub mod route_controller;

pub use auth_controller::AuthController;
pub use booking_controller::BookingController;
pub use bus_controller::BusController;
pub use route_controller::RouteController;
