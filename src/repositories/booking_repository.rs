use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::dto::CreateBookingRequest;
use crate::models::{
    Booking, BookingCreatedResponse, BookingRecord, BookingResponse, CancellationOutcome,
    Passenger, Seat, TicketRecord, TicketResponse,
};
use crate::utils::errors::AppError;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Confirmar una reserva en una única transacción
    ///
    /// Inserta cabecera y pasajeros, bloquea las filas de asiento en orden
    /// ascendente de id y re-chequea la ocupación ya con los cerrojos
    /// tomados. Si algún asiento fue ganado por otra transacción, se sale
    /// sin commit y el rollback revierte todo lo insertado.
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
        travel_date: NaiveDate,
        seats: &[Seat],
    ) -> Result<BookingCreatedResponse, AppError> {
        let mut seat_ids: Vec<i32> = seats.iter().map(|s| s.id).collect();
        seat_ids.sort_unstable();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error starting transaction: {}", e)))?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (user_id, bus_id, route_id, travel_date, total_fare, status, is_active, is_deleted)
            VALUES ($1, $2, $3, $4, $5, 'Confirmed', true, false)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(request.bus_id)
        .bind(request.route_id)
        .bind(travel_date)
        .bind(request.total_fare)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating booking: {}", e)))?;

        for passenger in &request.passengers {
            sqlx::query(
                "INSERT INTO passengers (booking_id, full_name, age, gender) VALUES ($1, $2, $3, $4)"
            )
            .bind(booking.id)
            .bind(&passenger.full_name)
            .bind(passenger.age)
            .bind(&passenger.gender)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error creating passengers: {}", e)))?;
        }

        // Cerrojos de asiento en orden ascendente de id: dos reservas que
        // compiten por un asiento común se serializan en esta fila
        let locked = sqlx::query_as::<_, Seat>(
            r#"
            SELECT id, bus_id, seat_number
            FROM seats
            WHERE id = ANY($1)
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(&seat_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error locking seats: {}", e)))?;

        if locked.len() != seat_ids.len() {
            return Err(AppError::ValidationError(
                "Algunos asientos seleccionados no existen".to_string(),
            ));
        }

        // Re-chequeo con los cerrojos tomados: este snapshot ya ve las
        // reservas confirmadas por la transacción que ganó la carrera
        let taken: Vec<i32> = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT bs.seat_id
            FROM booking_seats bs
            JOIN bookings b ON b.id = bs.booking_id
            WHERE bs.bus_id = $1
              AND b.travel_date = $2
              AND LOWER(b.status) <> 'cancelled'
              AND b.is_deleted = false
              AND bs.seat_id = ANY($3)
            "#,
        )
        .bind(request.bus_id)
        .bind(travel_date)
        .bind(&seat_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error re-checking seats: {}", e)))?;

        if !taken.is_empty() {
            // Salir sin commit revierte cabecera y pasajeros ya insertados
            let taken_set: HashSet<i32> = taken.into_iter().collect();
            let numbers = locked
                .iter()
                .filter(|s| taken_set.contains(&s.id))
                .map(|s| s.seat_number.clone())
                .collect();
            return Err(AppError::SeatsUnavailable(numbers));
        }

        for seat in &locked {
            sqlx::query(
                "INSERT INTO booking_seats (booking_id, seat_id, bus_id) VALUES ($1, $2, $3)"
            )
            .bind(booking.id)
            .bind(seat.id)
            .bind(seat.bus_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error assigning seats: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error committing booking: {}", e)))?;

        tracing::info!(
            booking_id = booking.id,
            bus_id = request.bus_id,
            seats = ?seat_ids,
            "Reserva confirmada"
        );

        Ok(BookingCreatedResponse {
            booking_id: booking.id,
            status: booking.status,
            travel_date: booking.travel_date,
            total_fare: booking.total_fare,
            seat_ids,
            seat_numbers: locked.iter().map(|s| s.seat_number.clone()).collect(),
        })
    }

    /// Cancelar una reserva liberando sus asientos en la misma transacción
    ///
    /// Cancelar lo ya cancelado es un no-op idempotente. No existe ventana
    /// en la que el estado diga "Cancelled" y los asientos sigan ocupados.
    pub async fn cancel_booking(&self, booking_id: i32) -> Result<CancellationOutcome, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error starting transaction: {}", e)))?;

        // Cerrojo sobre la cabecera: una cancelación concurrente del mismo
        // booking espera aquí y encuentra el estado ya actualizado
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error loading booking: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Reserva {} no encontrada", booking_id)))?;

        if booking.is_cancelled() {
            tx.commit()
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error committing transaction: {}", e)))?;
            return Ok(CancellationOutcome::AlreadyCancelled(booking));
        }

        let cancelled = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'Cancelled', is_active = false, is_deleted = true, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error cancelling booking: {}", e)))?;

        sqlx::query("DELETE FROM booking_seats WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error releasing seats: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error committing cancellation: {}", e)))?;

        tracing::info!(booking_id, "Reserva cancelada y asientos liberados");

        Ok(CancellationOutcome::Cancelled(cancelled))
    }

    /// Historial de reservas de un usuario con pasajeros y asientos
    ///
    /// Los pasajeros y números de asiento se cargan en dos consultas por
    /// lote y se agrupan en memoria.
    pub async fn bookings_for_user(&self, user_id: i32) -> Result<Vec<BookingResponse>, AppError> {
        let records = sqlx::query_as::<_, BookingRecord>(
            r#"
            SELECT b.id, b.user_id, b.bus_id, b.route_id, b.travel_date, b.total_fare,
                   b.status, b.created_at,
                   bus.bus_name, bus.bus_number,
                   r.origin, r.destination, r.departure_time, r.arrival_time
            FROM bookings b
            JOIN buses bus ON bus.id = b.bus_id
            JOIN routes r ON r.id = b.route_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing bookings: {}", e)))?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let booking_ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let mut passengers_by_booking = self.passengers_grouped(&booking_ids).await?;
        let mut seats_by_booking = self.seat_numbers_grouped(&booking_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let passengers = passengers_by_booking.remove(&record.id).unwrap_or_default();
                let seat_numbers = seats_by_booking.remove(&record.id).unwrap_or_default();
                BookingResponse::from_parts(record, seat_numbers, passengers)
            })
            .collect())
    }

    /// Detalle de billete de una reserva concreta
    pub async fn ticket_detail(&self, booking_id: i32) -> Result<Option<TicketResponse>, AppError> {
        let record = sqlx::query_as::<_, TicketRecord>(
            r#"
            SELECT b.id, b.user_id, b.bus_id, b.route_id, b.travel_date, b.total_fare,
                   b.status, b.created_at,
                   bus.bus_name, bus.bus_number,
                   r.origin, r.destination, r.departure_time, r.arrival_time,
                   u.full_name AS user_name, u.email AS user_email
            FROM bookings b
            JOIN buses bus ON bus.id = b.bus_id
            JOIN routes r ON r.id = b.route_id
            JOIN users u ON u.id = b.user_id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error loading ticket: {}", e)))?;

        let record = match record {
            Some(record) => record,
            None => return Ok(None),
        };

        let ids = vec![record.id];
        let mut passengers = self.passengers_grouped(&ids).await?;
        let mut seats = self.seat_numbers_grouped(&ids).await?;

        Ok(Some(TicketResponse::from_parts(
            record,
            seats.remove(&booking_id).unwrap_or_default(),
            passengers.remove(&booking_id).unwrap_or_default(),
        )))
    }

    async fn passengers_grouped(
        &self,
        booking_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<Passenger>>, AppError> {
        let rows = sqlx::query_as::<_, Passenger>(
            "SELECT * FROM passengers WHERE booking_id = ANY($1) ORDER BY id ASC"
        )
        .bind(booking_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error loading passengers: {}", e)))?;

        let mut grouped: HashMap<i32, Vec<Passenger>> = HashMap::new();
        for row in rows {
            grouped.entry(row.booking_id).or_default().push(row);
        }
        Ok(grouped)
    }

    async fn seat_numbers_grouped(
        &self,
        booking_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, AppError> {
        let rows: Vec<(i32, String)> = sqlx::query_as(
            r#"
            SELECT bs.booking_id, s.seat_number
            FROM booking_seats bs
            JOIN seats s ON s.id = bs.seat_id
            WHERE bs.booking_id = ANY($1)
            ORDER BY s.id ASC
            "#,
        )
        .bind(booking_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error loading booking seats: {}", e)))?;

        let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
        for (booking_id, seat_number) in rows {
            grouped.entry(booking_id).or_default().push(seat_number);
        }
        Ok(grouped)
    }
}
