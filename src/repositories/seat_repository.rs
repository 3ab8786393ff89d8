use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::Seat;
use crate::utils::errors::AppError;

pub struct SeatRepository {
    pool: PgPool,
}

impl SeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seats_for_bus(&self, bus_id: i32) -> Result<Vec<Seat>, AppError> {
        let seats = sqlx::query_as::<_, Seat>(
            "SELECT id, bus_id, seat_number FROM seats WHERE bus_id = $1 ORDER BY id ASC"
        )
        .bind(bus_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing seats: {}", e)))?;

        Ok(seats)
    }

    /// Resolver ids de asiento contra el pool de un bus concreto
    ///
    /// Solo devuelve los asientos que pertenecen al bus; ids ajenos o
    /// inexistentes simplemente no aparecen en el resultado.
    pub async fn seats_by_ids(&self, bus_id: i32, seat_ids: &[i32]) -> Result<Vec<Seat>, AppError> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT id, bus_id, seat_number
            FROM seats
            WHERE bus_id = $1 AND id = ANY($2)
            ORDER BY id ASC
            "#,
        )
        .bind(bus_id)
        .bind(seat_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error resolving seats: {}", e)))?;

        Ok(seats)
    }

    /// Ids de asientos ocupados de un bus para una fecha de viaje
    ///
    /// Una reserva ocupa sus asientos salvo que esté cancelada; el estado
    /// se compara sin distinguir mayúsculas.
    pub async fn occupied_seat_ids(
        &self,
        bus_id: i32,
        travel_date: NaiveDate,
    ) -> Result<HashSet<i32>, AppError> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT bs.seat_id
            FROM booking_seats bs
            JOIN bookings b ON b.id = bs.booking_id
            WHERE bs.bus_id = $1
              AND b.travel_date = $2
              AND LOWER(b.status) <> 'cancelled'
              AND b.is_deleted = false
            "#,
        )
        .bind(bus_id)
        .bind(travel_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error reading seat occupancy: {}", e)))?;

        Ok(ids.into_iter().collect())
    }
}
