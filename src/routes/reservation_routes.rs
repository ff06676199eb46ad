use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::reservation_dto::{
    AvailabilityQuery, AvailabilityResponse, CancelReservationRequest, CreateReservationRequest,
    ReservationFilters, ReservationResponse, TransitionReservationRequest,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_reservation))
        .route("/", get(list_reservations))
        .route("/availability", get(check_availability))
        .route("/:id", get(get_reservation))
        .route("/:id/transition", post(transition_reservation))
        .route("/:id/cancel", post(cancel_reservation))
}

fn controller(state: &AppState) -> ReservationController {
    ReservationController::new(
        state.pool.clone(),
        state.events.clone(),
        state.config.lock_timeout_ms,
    )
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let response = controller(&state).create(request).await?;
    Ok(Json(response))
}

async fn list_reservations(
    State(state): State<AppState>,
    Query(filters): Query<ReservationFilters>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let response = controller(&state).list(filters).await?;
    Ok(Json(response))
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    let response = controller(&state).get_by_id(id).await?;
    Ok(Json(response))
}

async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let response = controller(&state).check_availability(query).await?;
    Ok(Json(response))
}

async fn transition_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let response = controller(&state).transition(id, request).await?;
    Ok(Json(response))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>, AppError> {
    let response = controller(&state).cancel(id, request).await?;
    Ok(Json(response))
}
