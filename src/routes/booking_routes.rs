use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::{ApiResponse, CreateBookingRequest};
use crate::models::{Booking, BookingCreatedResponse, BookingResponse, TicketResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/:id", get(get_ticket))
        .route("/:id/cancel", put(cancel_booking))
        .route("/user/:user_id", get(bookings_for_user))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingCreatedResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}

async fn bookings_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.for_user(user_id).await?;
    Ok(Json(response))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TicketResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.ticket(id).await?;
    Ok(Json(response))
}
