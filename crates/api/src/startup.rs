use crate::{
    db, precipitation, routes, stations, temperature_between, temperature_from, tobs,
    welcome_handler, AnchorDate, ClimateAccess, ClimateData, Database,
};
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub anchor: AnchorDate,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation::precipitation,
        routes::climate::stations::stations,
        routes::climate::tobs::tobs,
        routes::climate::temperature::temperature_from,
        routes::climate::temperature::temperature_between,
    ),
    components(
        schemas(
            db::DailyPrecipitation,
            routes::climate::error::ErrorBody,
        )
    ),
    tags(
        (name = "climate api", description = "a read-only RESTful api over daily precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub fn build_app_state(remote_url: String, database: &Database, anchor: AnchorDate) -> AppState {
    AppState {
        remote_url,
        anchor,
        climate_db: Arc::new(ClimateAccess::new(database)),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(welcome_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
