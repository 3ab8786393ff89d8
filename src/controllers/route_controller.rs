use chrono::NaiveTime;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::{ApiResponse, CreateRouteRequest, UpdateRouteRequest};
use crate::models::RouteResponse;
use crate::repositories::{BusRepository, RouteRepository};
use crate::utils::errors::AppError;
use crate::utils::validation;

pub struct RouteController {
    repository: RouteRepository,
    bus_repository: BusRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RouteRepository::new(pool.clone()),
            bus_repository: BusRepository::new(pool),
        }
    }

    fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
        validation::validate_time(value).map_err(|_| {
            AppError::ValidationError("Formato de hora inválido, use HH:MM:SS".to_string())
        })
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        // La ruta solo puede colgar de un bus existente
        if self.bus_repository.find_by_id(request.bus_id).await?.is_none() {
            return Err(AppError::NotFound("Bus no encontrado".to_string()));
        }

        let departure_time = Self::parse_time(&request.departure_time)?;
        let arrival_time = Self::parse_time(&request.arrival_time)?;

        let route = self
            .repository
            .create(
                request.bus_id,
                &request.origin,
                &request.destination,
                departure_time,
                arrival_time,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<RouteResponse>>, AppError> {
        let routes = self.repository.list_all().await?;

        Ok(ApiResponse::success(
            routes.into_iter().map(RouteResponse::from).collect(),
        ))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ApiResponse<RouteResponse>, AppError> {
        let route = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        Ok(ApiResponse::success(RouteResponse::from(route)))
    }

    pub async fn for_bus(&self, bus_id: i32) -> Result<ApiResponse<Vec<RouteResponse>>, AppError> {
        if self.bus_repository.find_by_id(bus_id).await?.is_none() {
            return Err(AppError::NotFound("Bus no encontrado".to_string()));
        }

        let routes = self.repository.for_bus(bus_id).await?;

        Ok(ApiResponse::success(
            routes.into_iter().map(RouteResponse::from).collect(),
        ))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        let departure_time = match &request.departure_time {
            Some(value) => Some(Self::parse_time(value)?),
            None => None,
        };
        let arrival_time = match &request.arrival_time {
            Some(value) => Some(Self::parse_time(value)?),
            None => None,
        };

        let route = self
            .repository
            .update(
                id,
                request.origin.as_deref(),
                request.destination.as_deref(),
                departure_time,
                arrival_time,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Ruta actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<ApiResponse<()>, AppError> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("Ruta no encontrada".to_string()));
        }

        Ok(ApiResponse::success_with_message(
            (),
            "Ruta eliminada exitosamente".to_string(),
        ))
    }
}
