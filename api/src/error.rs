use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{identity::AuthenticationError, store::StoreError};

/// Errors that are the client's fault and carry their own status code.
pub trait ApiRequestError: std::error::Error {
    fn status_code(&self) -> StatusCode;
}

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    DatabaseError(#[from] StoreError),
}

#[derive(Debug)]
pub enum AppError {
    ServerError {
        error: ServerError,

        #[cfg(debug_assertions)]
        backtrace: Option<backtrace::Backtrace>,
    },
    Request {
        message: String,
        status_code: StatusCode,
    },
}

/// Every failure reaches the client as `{"message": "..."}`.
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                #[cfg(debug_assertions)]
                {
                    let frames = backtrace.as_ref().map(filter_backtrace).unwrap_or_default();
                    tracing::error!(%error, backtrace = ?frames, "Server error");
                }
                #[cfg(not(debug_assertions))]
                tracing::error!(%error, "Server error");

                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            AppError::Request {
                message,
                status_code,
            } => (status_code, message),
        };

        (status_code, Json(ErrorResponse { message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::ServerError {
            error: ServerError::DatabaseError(e),

            #[cfg(debug_assertions)]
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        AppError::Request {
            status_code: e.status_code(),
            message: e.to_string(),
        }
    }
}

impl From<(&'static str, StatusCode)> for AppError {
    fn from((message, status_code): (&'static str, StatusCode)) -> Self {
        AppError::Request {
            message: message.into(),
            status_code,
        }
    }
}

impl From<(String, StatusCode)> for AppError {
    fn from((message, status_code): (String, StatusCode)) -> Self {
        AppError::Request {
            message,
            status_code,
        }
    }
}

#[cfg(debug_assertions)]
#[derive(Debug)]
#[allow(dead_code)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename(),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.to_string_lossy(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
