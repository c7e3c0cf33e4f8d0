use std::sync::Arc;

use axum::{extract::State, Json};
use log::{debug, info};

use crate::{one_year_before, ApiError, AppState, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station for the year before the anchor date, most recent first", body = Vec<f64>),
        (status = NOT_FOUND, description = "Dataset holds no observations", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<f64>>, ApiError> {
    let Some(most_active) = state.climate_db.most_active_station().await? else {
        info!("no observations found, cannot pick a most active station");
        return Err(ApiError::EmptyDataset);
    };
    let anchor = state
        .anchor
        .resolve(state.climate_db.as_ref())
        .await?
        .ok_or(ApiError::EmptyDataset)?;
    let since = one_year_before(anchor);
    debug!(
        "most active station {} ({} observations), tobs since {}",
        most_active.station, most_active.observation_count, since
    );

    let temperatures = state
        .climate_db
        .temperature_observations(&most_active.station, since)
        .await?;
    Ok(Json(temperatures))
}
