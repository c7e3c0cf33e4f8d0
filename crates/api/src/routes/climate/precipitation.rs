use std::sync::Arc;

use axum::{extract::State, Json};
use log::debug;

use crate::{one_year_before, ApiError, AppState, DailyPrecipitation, ErrorBody};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings for the year before the anchor date, oldest first", body = Vec<DailyPrecipitation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailyPrecipitation>>, ApiError> {
    let Some(anchor) = state.anchor.resolve(state.climate_db.as_ref()).await? else {
        return Ok(Json(vec![]));
    };
    let since = one_year_before(anchor);
    debug!("precipitation since {} (anchor {})", since, anchor);

    let readings = state.climate_db.precipitation_since(since).await?;
    Ok(Json(readings))
}
