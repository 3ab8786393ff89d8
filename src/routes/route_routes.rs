use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::{ApiResponse, CreateRouteRequest, UpdateRouteRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::RouteResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router(state: AppState) -> Router<AppState> {
    // Las mutaciones de rutas son solo para administradores
    let admin = Router::new()
        .route("/", post(create_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/bus/:bus_id", get(routes_for_bus))
        .merge(admin)
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RouteResponse>>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn routes_for_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<RouteResponse>>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.for_bus(bus_id).await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
