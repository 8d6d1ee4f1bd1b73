//! Maps core errors onto HTTP responses.
//!
//! Details of server-side failures go to the log; the visitor only sees a
//! short message on the rendered error page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use mb_core::AppError;
use mb_ui::{render, ErrorTemplate, SITE_TITLE};
use tracing::{debug, error};

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::UnrecognizedFilter(_) => StatusCode::BAD_REQUEST,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::MalformedDocument { .. }
            | AppError::Notification(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match &self.0 {
            AppError::NotFound(kind, id) => format!("{kind} {id} was not found."),
            AppError::UnrecognizedFilter(value) => format!(
                "Unknown filter \"{value}\". Try under-100, highly-rated or surprise."
            ),
            AppError::StorageUnavailable(_) => {
                "Listings are temporarily unavailable. Please try again shortly.".to_string()
            }
            _ => "Something went wrong on our side.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, %status, "Request failed");
        } else {
            debug!(error = %self.0, %status, "Request rejected");
        }

        let message = self.public_message();
        match render(&ErrorTemplate {
            title: SITE_TITLE,
            status: status.as_u16(),
            message: &message,
        }) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}
