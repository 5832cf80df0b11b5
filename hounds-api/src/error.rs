//! API error type and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hounds_core::GameError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    Validation(String),
    #[error("game {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

#[derive(Serialize)]
struct ErrorModel {
    reason: &'static str,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Game(GameError::UnknownPlayer) => StatusCode::NOT_FOUND,
            ApiError::Game(GameError::MatchFull) => StatusCode::GONE,
            ApiError::Game(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "INVALID_GAME_ID",
            ApiError::Game(GameError::UnknownPlayer) => "INVALID_PLAYER_ID",
            ApiError::Game(GameError::MatchFull) => "GAME_FULL",
            ApiError::Game(GameError::WrongTurn) => "INCORRECT_TURN",
            ApiError::Game(GameError::IllegalMove(_)) => "ILLEGAL_MOVE",
            ApiError::Game(GameError::MatchFinished) => "GAME_FINISHED",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::NotFound(id.to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(reason = self.reason(), error = %self, "request rejected");
        }
        let body = ErrorModel {
            reason: self.reason(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
