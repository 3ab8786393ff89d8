use sqlx::PgPool;
use validator::Validate;

use crate::dto::{
    ApiResponse, BusSearchQuery, CreateBusRequest, SeatAvailabilityQuery, UpdateBusRequest,
};
use crate::models::{
    AvailableSeatsResponse, BusResponse, RouteSearchResult, SeatStatus, SeatSummary,
};
use crate::repositories::{BusRepository, SeatRepository};
use crate::utils::errors::AppError;
use crate::utils::validation;

pub struct BusController {
    repository: BusRepository,
    seat_repository: SeatRepository,
}

impl BusController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BusRepository::new(pool.clone()),
            seat_repository: SeatRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateBusRequest,
    ) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;

        // Verificar que el número de bus no exista
        if self.repository.bus_number_exists(&request.bus_number).await? {
            return Err(AppError::Conflict(
                "El número de bus ya está registrado".to_string(),
            ));
        }

        let bus = self.repository.create_with_seats(&request).await?;

        Ok(ApiResponse::success_with_message(
            BusResponse::from(bus),
            "Bus creado exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<BusResponse>>, AppError> {
        let buses = self.repository.list_active().await?;

        Ok(ApiResponse::success(
            buses.into_iter().map(BusResponse::from).collect(),
        ))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ApiResponse<BusResponse>, AppError> {
        let bus = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        Ok(ApiResponse::success(BusResponse::from(bus)))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateBusRequest,
    ) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;

        let bus = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        Ok(ApiResponse::success_with_message(
            BusResponse::from(bus),
            "Bus actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<ApiResponse<()>, AppError> {
        let deactivated = self.repository.deactivate(id).await?;

        if !deactivated {
            return Err(AppError::NotFound("Bus no encontrado".to_string()));
        }

        Ok(ApiResponse::success_with_message(
            (),
            "Bus desactivado exitosamente".to_string(),
        ))
    }

    pub async fn search(
        &self,
        query: BusSearchQuery,
    ) -> Result<ApiResponse<Vec<RouteSearchResult>>, AppError> {
        validation::validate_not_empty(&query.origin)
            .map_err(|_| AppError::ValidationError("El origen es requerido".to_string()))?;
        validation::validate_not_empty(&query.destination)
            .map_err(|_| AppError::ValidationError("El destino es requerido".to_string()))?;

        let mut results = self
            .repository
            .search_by_route(&query.origin, &query.destination)
            .await?;

        // Con fecha se anota la disponibilidad de cada bus encontrado
        if let Some(date_str) = &query.date {
            let travel_date = validation::validate_date(date_str).map_err(|_| {
                AppError::ValidationError("Formato de fecha inválido, use YYYY-MM-DD".to_string())
            })?;

            for result in &mut results {
                let occupied = self
                    .seat_repository
                    .occupied_seat_ids(result.bus_id, travel_date)
                    .await?;
                result.available_seats = Some(result.total_seats - occupied.len() as i32);
            }
        }

        Ok(ApiResponse::success(results))
    }

    /// Asientos libres de un bus para una fecha de viaje
    pub async fn available_seats(
        &self,
        bus_id: i32,
        query: SeatAvailabilityQuery,
    ) -> Result<ApiResponse<AvailableSeatsResponse>, AppError> {
        let travel_date = validation::validate_date(&query.date).map_err(|_| {
            AppError::ValidationError("Formato de fecha inválido, use YYYY-MM-DD".to_string())
        })?;

        let bus = self
            .repository
            .find_by_id(bus_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        let seats = self.seat_repository.seats_for_bus(bus_id).await?;
        let occupied = self
            .seat_repository
            .occupied_seat_ids(bus_id, travel_date)
            .await?;

        let available: Vec<SeatSummary> = seats
            .into_iter()
            .filter(|seat| !occupied.contains(&seat.id))
            .map(SeatSummary::from)
            .collect();

        Ok(ApiResponse::success(AvailableSeatsResponse {
            bus_id: bus.id,
            travel_date,
            total_seats: bus.total_seats,
            booked_seats: occupied.len() as i32,
            available_seats: available,
        }))
    }

    /// Mapa completo de asientos con su estado para una fecha de viaje
    pub async fn seat_map(
        &self,
        bus_id: i32,
        query: SeatAvailabilityQuery,
    ) -> Result<ApiResponse<Vec<SeatStatus>>, AppError> {
        let travel_date = validation::validate_date(&query.date).map_err(|_| {
            AppError::ValidationError("Formato de fecha inválido, use YYYY-MM-DD".to_string())
        })?;

        if self.repository.find_by_id(bus_id).await?.is_none() {
            return Err(AppError::NotFound("Bus no encontrado".to_string()));
        }

        let seats = self.seat_repository.seats_for_bus(bus_id).await?;
        let occupied = self
            .seat_repository
            .occupied_seat_ids(bus_id, travel_date)
            .await?;

        let statuses: Vec<SeatStatus> = seats
            .into_iter()
            .map(|seat| SeatStatus {
                seat_id: seat.id,
                is_booked: occupied.contains(&seat.id),
                seat_number: seat.seat_number,
            })
            .collect();

        Ok(ApiResponse::success(statuses))
    }
}
