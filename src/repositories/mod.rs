//! Capa de acceso a datos
//!
//! Cada repositorio encapsula las consultas SQL de una tabla o agregado.
//! Las transacciones multi-tabla (reservas, cancelaciones, alta de buses
//! con asientos) viven aquí, nunca en los controllers.

pub mod booking_repository;
pub mod bus_repository;
pub mod route_repository;
pub mod seat_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use bus_repository::BusRepository;
pub use route_repository::RouteRepository;
pub use seat_repository::SeatRepository;
pub use user_repository::UserRepository;
