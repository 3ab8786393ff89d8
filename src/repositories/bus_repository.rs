use sqlx::PgPool;

use crate::dto::{CreateBusRequest, UpdateBusRequest};
use crate::models::{Bus, RouteSearchResult};
use crate::utils::errors::AppError;

pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear un bus junto con su pool fijo de asientos "1".."total_seats"
    ///
    /// Bus y asientos se insertan en la misma transacción: nunca queda un
    /// bus sin asientos ni asientos huérfanos.
    pub async fn create_with_seats(&self, request: &CreateBusRequest) -> Result<Bus, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error starting transaction: {}", e)))?;

        let bus = sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO buses (bus_name, bus_number, bus_type, fare, total_seats, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING *
            "#,
        )
        .bind(&request.bus_name)
        .bind(&request.bus_number)
        .bind(&request.bus_type)
        .bind(request.fare)
        .bind(request.total_seats)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating bus: {}", e)))?;

        for seat_number in 1..=request.total_seats {
            sqlx::query("INSERT INTO seats (bus_id, seat_number) VALUES ($1, $2)")
                .bind(bus.id)
                .bind(seat_number.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error creating seats: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error committing transaction: {}", e)))?;

        Ok(bus)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Bus>, AppError> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding bus: {}", e)))?;

        Ok(bus)
    }

    pub async fn list_active(&self) -> Result<Vec<Bus>, AppError> {
        let buses = sqlx::query_as::<_, Bus>(
            "SELECT * FROM buses WHERE is_active = true ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing buses: {}", e)))?;

        Ok(buses)
    }

    pub async fn bus_number_exists(&self, bus_number: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM buses WHERE bus_number = $1)"
        )
        .bind(bus_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error checking bus number: {}", e)))?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: i32,
        request: &UpdateBusRequest,
    ) -> Result<Option<Bus>, AppError> {
        let bus = sqlx::query_as::<_, Bus>(
            r#"
            UPDATE buses
            SET bus_name = COALESCE($2, bus_name),
                bus_type = COALESCE($3, bus_type),
                fare = COALESCE($4, fare),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.bus_name.as_deref())
        .bind(request.bus_type.as_deref())
        .bind(request.fare)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error updating bus: {}", e)))?;

        Ok(bus)
    }

    /// Baja lógica: el bus deja de aparecer en listados y búsquedas pero
    /// sus reservas históricas se conservan
    pub async fn deactivate(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE buses SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error deactivating bus: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    /// Buscar buses activos que sirven un trayecto origen-destino
    pub async fn search_by_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<RouteSearchResult>, AppError> {
        let results = sqlx::query_as::<_, RouteSearchResult>(
            r#"
            SELECT r.id AS route_id, b.id AS bus_id, b.bus_name, b.bus_number,
                   b.bus_type, b.fare, b.total_seats,
                   r.origin, r.destination, r.departure_time, r.arrival_time
            FROM routes r
            JOIN buses b ON b.id = r.bus_id
            WHERE b.is_active = true
              AND r.origin ILIKE $1
              AND r.destination ILIKE $2
            ORDER BY r.departure_time ASC
            "#,
        )
        .bind(origin.trim())
        .bind(destination.trim())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error searching buses: {}", e)))?;

        Ok(results)
    }
}
