use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::fleet_controller::FleetController;
use crate::dto::fleet_dto::{
    AlertsQuery, FleetSnapshotResponse, MaintenanceAlertResponse, SnapshotQuery,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/snapshot", get(fleet_snapshot))
        .route("/maintenance-alerts", get(maintenance_alerts))
}

async fn fleet_snapshot(
    State(state): State<AppState>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<FleetSnapshotResponse>, AppError> {
    let controller = FleetController::new(state.pool.clone());
    let response = controller.snapshot(query).await?;
    Ok(Json(response))
}

async fn maintenance_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<MaintenanceAlertResponse>>, AppError> {
    let controller = FleetController::new(state.pool.clone());
    let response = controller.maintenance_alerts(query).await?;
    Ok(Json(response))
}
