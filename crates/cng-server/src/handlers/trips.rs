//! Trip ledger handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::read_json;
use crate::{AppError, AppState, SuccessResponse};
use cng_core::{compute_trip_metrics, RecordedTrip, Trip, TripId, TripInputs, TripMetrics};

#[derive(Debug, Deserialize)]
pub struct DeleteTripsRequest {
    pub ids: Vec<TripId>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTripsResponse {
    pub deleted: usize,
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}

/// POST /api/calculate - Compute metrics without storing them
pub async fn calculate(request: Request) -> Result<Json<TripMetrics>, AppError> {
    let inputs: TripInputs = read_json(request).await?;
    let metrics = compute_trip_metrics(&inputs)?;
    Ok(Json(metrics))
}

/// POST /api/trips - Compute metrics and record the trip
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecordedTrip>, AppError> {
    let inputs: TripInputs = read_json(request).await?;
    let recorded = state.tracker.compute_and_persist(&inputs)?;

    info!(
        trip_id = recorded.id,
        savings = recorded.metrics.savings,
        "Trip recorded via API"
    );

    Ok(Json(recorded))
}

/// GET /api/trips - Full history, oldest first
pub async fn list_trips(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Trip>>, AppError> {
    let trips = state.db().list_trips()?;
    Ok(Json(trips))
}

/// GET /api/trips/:id - Get a single trip
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TripId>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .db()
        .get_trip(id)?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;
    Ok(Json(trip))
}

/// DELETE /api/trips/:id - Delete one trip (no-op if already gone)
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TripId>,
) -> Result<StatusCode, AppError> {
    state.tracker.delete_trips(&[id])?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/trips/delete - Delete a batch of trips
pub async fn delete_trips(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DeleteTripsResponse>, AppError> {
    let body: DeleteTripsRequest = read_json(request).await?;
    let deleted = state.tracker.delete_trips(&body.ids)?;
    Ok(Json(DeleteTripsResponse { deleted }))
}
