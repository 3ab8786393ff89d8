use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::bus_controller::BusController;
use crate::dto::{
    ApiResponse, BusSearchQuery, CreateBusRequest, SeatAvailabilityQuery, UpdateBusRequest,
};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::{AvailableSeatsResponse, BusResponse, RouteSearchResult, SeatStatus};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bus_router(state: AppState) -> Router<AppState> {
    // Las mutaciones de flota son solo para administradores
    let admin = Router::new()
        .route("/", post(create_bus))
        .route("/:id", put(update_bus))
        .route("/:id", delete(delete_bus))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_buses))
        .route("/search", get(search_buses))
        .route("/:id", get(get_bus))
        .route("/:id/available-seats", get(available_seats))
        .route("/:id/seats", get(seat_map))
        .merge(admin)
}

async fn create_bus(
    State(state): State<AppState>,
    Json(request): Json<CreateBusRequest>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_buses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BusResponse>>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBusRequest>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn search_buses(
    State(state): State<AppState>,
    Query(query): Query<BusSearchQuery>,
) -> Result<Json<ApiResponse<Vec<RouteSearchResult>>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.search(query).await?;
    Ok(Json(response))
}

async fn available_seats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<SeatAvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailableSeatsResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.available_seats(id, query).await?;
    Ok(Json(response))
}

async fn seat_map(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<SeatAvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<SeatStatus>>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.seat_map(id, query).await?;
    Ok(Json(response))
}
