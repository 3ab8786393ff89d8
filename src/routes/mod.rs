pub mod auth_routes;
pub mod booking_routes;
pub mod bus_routes;
pub mod route_routes;

pub use auth_routes::create_auth_router;
pub use booking_routes::create_booking_router;
pub use bus_routes::create_bus_router;
pub use route_routes::create_route_router;
