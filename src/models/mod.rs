//! Modelos de datos del sistema de reservas
//!
//! Este módulo contiene todos los structs que mapean a las tablas de la
//! base de datos y sus responses asociadas.

pub mod booking;
pub mod bus;
pub mod route;
pub mod user;

pub use booking::*;
pub use bus::*;
pub use route::*;
pub use user::*;
