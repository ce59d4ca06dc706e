//! Aggregate, trend, and export handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use cng_core::export::export_trips;
use cng_core::trends::DEFAULT_HISTOGRAM_BINS;
use cng_core::{
    savings_histogram, summarize, trend_series, ExportFormat, HistogramBin, TripHistory,
    TripSummary, TrendSeries,
};

/// Upper bound on histogram bins accepted from clients
const MAX_HISTOGRAM_BINS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct HistogramQuery {
    pub bins: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /api/summary - Overall analysis of the history
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TripSummary>, AppError> {
    let trips = state.db().list_trips()?;
    Ok(Json(summarize(&trips)))
}

/// GET /api/history - Trips plus summary in one response
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TripHistory>, AppError> {
    Ok(Json(state.tracker.history()?))
}

/// GET /api/trends - Chart series for every dashboard panel
pub async fn get_trends(State(state): State<Arc<AppState>>) -> Result<Json<TrendSeries>, AppError> {
    let trips = state.db().list_trips()?;
    Ok(Json(trend_series(&trips)))
}

/// GET /api/trends/histogram - Savings distribution
pub async fn get_savings_histogram(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistogramQuery>,
) -> Result<Json<Vec<HistogramBin>>, AppError> {
    let bins = params.bins.unwrap_or(DEFAULT_HISTOGRAM_BINS);
    if bins > MAX_HISTOGRAM_BINS {
        return Err(AppError::bad_request(&format!(
            "bins must be at most {}",
            MAX_HISTOGRAM_BINS
        )));
    }

    let trips = state.db().list_trips()?;
    Ok(Json(savings_histogram(&trips, bins)?))
}

/// GET /api/export - Download the history as CSV or JSON
pub async fn export_trips_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("csv").parse()?;

    let trips = state.db().list_trips()?;
    let mut body = Vec::new();
    export_trips(&trips, format, &mut body)?;

    let disposition = format!("attachment; filename=\"cng-trips.{}\"", format.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
