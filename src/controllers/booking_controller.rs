use std::collections::HashSet;

use sqlx::PgPool;
use validator::Validate;

use crate::dto::{ApiResponse, CreateBookingRequest};
use crate::models::{
    Booking, BookingCreatedResponse, BookingResponse, CancellationOutcome, Seat, TicketResponse,
};
use crate::repositories::{
    BookingRepository, BusRepository, RouteRepository, SeatRepository, UserRepository,
};
use crate::utils::errors::AppError;
use crate::utils::validation;

pub struct BookingController {
    repository: BookingRepository,
    seat_repository: SeatRepository,
    bus_repository: BusRepository,
    route_repository: RouteRepository,
    user_repository: UserRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            seat_repository: SeatRepository::new(pool.clone()),
            bus_repository: BusRepository::new(pool.clone()),
            route_repository: RouteRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingCreatedResponse>, AppError> {
        request.validate()?;

        if request.passengers.is_empty() {
            return Err(AppError::ValidationError(
                "Debe registrar al menos un pasajero".to_string(),
            ));
        }

        // La fecha viaja como "YYYY-MM-DD" y se guarda tal cual
        let travel_date = validation::validate_date(&request.travel_date).map_err(|_| {
            AppError::ValidationError("Formato de fecha inválido, use YYYY-MM-DD".to_string())
        })?;

        let seat_ids = Self::normalize_seat_ids(&request.seat_ids)?;

        // Verificar referencias antes de tocar el inventario
        let bus = self
            .bus_repository
            .find_by_id(request.bus_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        if !bus.is_active {
            return Err(AppError::Conflict("El bus no está operativo".to_string()));
        }

        let route = self
            .route_repository
            .find_by_id(request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        if route.bus_id != bus.id {
            return Err(AppError::ValidationError(
                "La ruta no pertenece al bus indicado".to_string(),
            ));
        }

        if self.user_repository.find_by_id(request.user_id).await?.is_none() {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        // Resolver los ids contra el pool de asientos del bus; un id ajeno
        // es una petición inválida, no un conflicto de disponibilidad
        let seats = self.seat_repository.seats_by_ids(bus.id, &seat_ids).await?;
        if seats.len() != seat_ids.len() {
            let missing = Self::missing_seat_ids(&seat_ids, &seats);
            return Err(AppError::ValidationError(format!(
                "Asientos inexistentes para este bus: {}",
                missing.join(", ")
            )));
        }

        // Pre-chequeo de disponibilidad; la transacción re-chequea bajo
        // cerrojo y es quien tiene la última palabra
        let occupied = self
            .seat_repository
            .occupied_seat_ids(bus.id, travel_date)
            .await?;
        let conflicts = Self::conflicting_seat_numbers(&seats, &occupied);
        if !conflicts.is_empty() {
            return Err(AppError::SeatsUnavailable(conflicts));
        }

        let created = self
            .repository
            .create_booking(&request, travel_date, &seats)
            .await?;

        Ok(ApiResponse::success_with_message(
            created,
            "Reserva confirmada exitosamente".to_string(),
        ))
    }

    pub async fn cancel(&self, booking_id: i32) -> Result<ApiResponse<Booking>, AppError> {
        match self.repository.cancel_booking(booking_id).await? {
            CancellationOutcome::Cancelled(booking) => Ok(ApiResponse::success_with_message(
                booking,
                "Reserva cancelada exitosamente".to_string(),
            )),
            CancellationOutcome::AlreadyCancelled(booking) => Ok(ApiResponse::success_with_message(
                booking,
                "La reserva ya estaba cancelada".to_string(),
            )),
        }
    }

    pub async fn for_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<BookingResponse>>, AppError> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("Usuario no encontrado".to_string()));
        }

        let bookings = self.repository.bookings_for_user(user_id).await?;

        Ok(ApiResponse::success(bookings))
    }

    pub async fn ticket(&self, booking_id: i32) -> Result<ApiResponse<TicketResponse>, AppError> {
        let ticket = self
            .repository
            .ticket_detail(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reserva {} no encontrada", booking_id)))?;

        Ok(ApiResponse::success(ticket))
    }

    /// Deduplicar y ordenar los ids solicitados; lista vacía o ids no
    /// positivos son peticiones inválidas
    fn normalize_seat_ids(raw: &[i32]) -> Result<Vec<i32>, AppError> {
        if raw.is_empty() {
            return Err(AppError::ValidationError(
                "Debe seleccionar al menos un asiento".to_string(),
            ));
        }

        if raw.iter().any(|id| *id <= 0) {
            return Err(AppError::ValidationError(
                "Los ids de asiento deben ser positivos".to_string(),
            ));
        }

        let mut ids: Vec<i32> = raw.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    fn missing_seat_ids(requested: &[i32], resolved: &[Seat]) -> Vec<String> {
        let found: HashSet<i32> = resolved.iter().map(|s| s.id).collect();
        requested
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect()
    }

    fn conflicting_seat_numbers(seats: &[Seat], occupied: &HashSet<i32>) -> Vec<String> {
        seats
            .iter()
            .filter(|seat| occupied.contains(&seat.id))
            .map(|seat| seat.seat_number.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: i32, number: &str) -> Seat {
        Seat {
            id,
            bus_id: 1,
            seat_number: number.to_string(),
        }
    }

    #[test]
    fn test_normalize_seat_ids_dedup_y_orden() {
        let ids = BookingController::normalize_seat_ids(&[7, 3, 7, 5, 3]).unwrap();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_normalize_seat_ids_rechaza_vacio() {
        assert!(BookingController::normalize_seat_ids(&[]).is_err());
    }

    #[test]
    fn test_normalize_seat_ids_rechaza_no_positivos() {
        assert!(BookingController::normalize_seat_ids(&[1, 0]).is_err());
        assert!(BookingController::normalize_seat_ids(&[-4]).is_err());
    }

    #[test]
    fn test_missing_seat_ids() {
        let resolved = vec![seat(1, "1"), seat(3, "3")];
        let missing = BookingController::missing_seat_ids(&[1, 2, 3, 9], &resolved);
        assert_eq!(missing, vec!["2".to_string(), "9".to_string()]);
    }

    #[test]
    fn test_conflicting_seat_numbers() {
        let seats = vec![seat(10, "1"), seat(11, "2"), seat(12, "3")];
        let occupied: HashSet<i32> = [11, 99].into_iter().collect();

        let conflicts = BookingController::conflicting_seat_numbers(&seats, &occupied);
        assert_eq!(conflicts, vec!["2".to_string()]);
    }

    #[test]
    fn test_sin_conflictos_con_ocupacion_ajena() {
        let seats = vec![seat(10, "1"), seat(12, "3")];
        let occupied: HashSet<i32> = [11].into_iter().collect();

        assert!(BookingController::conflicting_seat_numbers(&seats, &occupied).is_empty());
    }
}
