use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CreateMaintenanceRequest, MaintenanceResponse,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_maintenance))
        .route("/:id", get(get_maintenance))
        .route("/:id/complete", post(complete_maintenance))
        .route("/vehicle/:vehicle_id", get(list_by_vehicle))
}

async fn create_maintenance(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceResponse>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.complete(id, request).await?;
    Ok(Json(response))
}

async fn list_by_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<MaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.list_by_vehicle(vehicle_id).await?;
    Ok(Json(response))
}
