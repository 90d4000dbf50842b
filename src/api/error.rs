use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::error::DashboardError;

/// HTTP wrapper around `DashboardError`.
#[derive(Debug)]
pub struct ApiError(pub DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    status: u16,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DashboardError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "invalid_range"),
            DashboardError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
            DashboardError::InvalidIndicator(_) => (StatusCode::BAD_REQUEST, "invalid_indicator"),
            DashboardError::InvalidPageSize { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_page_size")
            }
            DashboardError::InsufficientHistory { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_history")
            }
            DashboardError::DataUnavailable { .. } => (StatusCode::BAD_GATEWAY, "data_unavailable"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_kind();
        if status.is_server_error() {
            warn!(error, message = %self.0, "request failed");
        }

        let body = ErrorBody {
            error,
            message: self.0.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::types::Indicator;

    #[test]
    fn status_mapping() {
        let cases = [
            (DashboardError::InvalidDate("x".into()), StatusCode::BAD_REQUEST),
            (DashboardError::InvalidIndicator("x".into()), StatusCode::BAD_REQUEST),
            (
                DashboardError::InvalidRange {
                    start: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::InvalidPageSize { size: 0, max: 250 },
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::InsufficientHistory {
                    indicator: Indicator::Bollinger,
                    required: 20,
                    available: 5,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DashboardError::DataUnavailable {
                    ticker: "X".into(),
                    reason: "timeout".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
