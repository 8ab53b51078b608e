use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chess_review_core::rules::InvalidFen;
use chess_review_core::{EngineError, ReviewError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    InvalidFen(#[from] InvalidFen),

    #[error("Review did not finish within {}s", .0.as_secs_f64())]
    Deadline(Duration),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MalformedRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "details": msg }),
            ),
            AppError::Review(ReviewError::IllegalMove(illegal)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!("Illegal move: {}", illegal.mv),
                    "details": {
                        "move": illegal.mv,
                        "fenBefore": illegal.fen_before,
                        "moveIndex": illegal.index,
                    }
                }),
            ),
            AppError::InvalidFen(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid position", "details": e.to_string() }),
            ),
            AppError::Review(ReviewError::Engine { .. }) | AppError::Engine(_) | AppError::Deadline(_) => {
                tracing::error!("Analysis failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Analysis failed", "details": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
