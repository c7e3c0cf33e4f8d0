use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

use crate::db::{self, parse_date};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("No observations available")]
    EmptyDataset,
    #[error("Invalid {param} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { param: &'static str, value: String },
    #[error("Failed to query climate data: {0}")]
    Data(#[from] db::Error),
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::EmptyDataset => StatusCode::NOT_FOUND,
            ApiError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            ApiError::Data(e) => {
                error!("error querying climate data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: String::from("Failed to query climate data"),
                    }),
                )
                    .into_response();
            }
        };

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn parse_date_param(param: &'static str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|_| ApiError::InvalidDate {
        param,
        value: value.to_owned(),
    })
}
