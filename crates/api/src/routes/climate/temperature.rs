use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;

use crate::{parse_date_param, ApiError, AppState, ErrorBody};

/// Serialized as `[min, max, avg]`, each null when nothing matched.
type TemperatureRow = [Option<f64>; 3];

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date of the range, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "One [min, max, avg] temperature row for observations on or after start", body = Vec<Vec<f64>>),
        (status = BAD_REQUEST, description = "start is not a YYYY-MM-DD date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureRow>>, ApiError> {
    let start = parse_date_param("start", &start)?;
    debug!("temperature summary from {}", start);

    let summary = state.climate_db.temperature_summary(start, None).await?;
    Ok(Json(vec![summary.as_row()]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date of the range, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date of the range (inclusive), YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "One [min, max, avg] temperature row for observations between start and end inclusive", body = Vec<Vec<f64>>),
        (status = BAD_REQUEST, description = "start or end is not a YYYY-MM-DD date", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureRow>>, ApiError> {
    let start = parse_date_param("start", &start)?;
    let end = parse_date_param("end", &end)?;
    // An inverted range is not rejected, it simply matches nothing
    debug!("temperature summary from {} to {}", start, end);

    let summary = state.climate_db.temperature_summary(start, Some(end)).await?;
    Ok(Json(vec![summary.as_row()]))
}
