use chrono::NaiveTime;
use sqlx::PgPool;

use crate::models::Route;
use crate::utils::errors::AppError;

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        bus_id: i32,
        origin: &str,
        destination: &str,
        departure_time: NaiveTime,
        arrival_time: NaiveTime,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (bus_id, origin, destination, departure_time, arrival_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(bus_id)
        .bind(origin)
        .bind(destination)
        .bind(departure_time)
        .bind(arrival_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating route: {}", e)))?;

        Ok(route)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding route: {}", e)))?;

        Ok(route)
    }

    pub async fn list_all(&self) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes ORDER BY origin ASC, departure_time ASC"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing routes: {}", e)))?;

        Ok(routes)
    }

    pub async fn for_bus(&self, bus_id: i32) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE bus_id = $1 ORDER BY departure_time ASC"
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing routes for bus: {}", e)))?;

        Ok(routes)
    }

    pub async fn update(
        &self,
        id: i32,
        origin: Option<&str>,
        destination: Option<&str>,
        departure_time: Option<NaiveTime>,
        arrival_time: Option<NaiveTime>,
    ) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET origin = COALESCE($2, origin),
                destination = COALESCE($3, destination),
                departure_time = COALESCE($4, departure_time),
                arrival_time = COALESCE($5, arrival_time)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(origin)
        .bind(destination)
        .bind(departure_time)
        .bind(arrival_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error updating route: {}", e)))?;

        Ok(route)
    }

    /// Eliminar una ruta. Si existen reservas asociadas el borrado viola la
    /// foreign key y se reporta como conflicto, no como error interno.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error().and_then(|db| db.code()) {
                Some(code) if code == "23503" => AppError::Conflict(
                    "No se puede eliminar una ruta con reservas asociadas".to_string(),
                ),
                _ => AppError::DatabaseError(format!("Error deleting route: {}", e)),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
