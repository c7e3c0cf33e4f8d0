use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{ApiError, AppState, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Ids of every station with observations", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let station_ids = state.climate_db.station_ids().await?;
    Ok(Json(station_ids))
}
