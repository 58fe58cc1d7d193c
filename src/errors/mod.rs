use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error taxonomy for a single request.
///
/// Every variant is terminal for the request that produced it; nothing here
/// is retried and nothing crashes the server process.
#[derive(Debug)]
pub enum ServeError {
    NotFound,
    PermissionDenied,
    Io(io::Error),
    Render(String),
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ServeError::NotFound,
            io::ErrorKind::PermissionDenied => ServeError::PermissionDenied,
            _ => ServeError::Io(err),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        match self {
            // Body "404" matches the plain-text contract for missing paths.
            ServeError::NotFound => (StatusCode::NOT_FOUND, "404").into_response(),
            ServeError::PermissionDenied => {
                log::warn!("permission denied while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, "500").into_response()
            }
            ServeError::Io(e) => {
                log::error!("I/O error while serving request: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "500").into_response()
            }
            ServeError::Render(e) => {
                log::error!("render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "500").into_response()
            }
        }
    }
}
