//! HTTP error type for the directory routes.
//!
//! Handlers return [`Result`]. Server-side failures are reported to Sentry
//! and answered with a generic message; client errors carry their text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::data::DataError;
use crate::view::DeleteRejected;

#[derive(Debug, Error)]
pub enum AppError {
    /// The shop data service failed or refused the call.
    #[error("Data service error: {0}")]
    Data(#[from] DataError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A deletion of the same shop is still running.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DeleteRejected> for AppError {
    fn from(err: DeleteRejected) -> Self {
        match err {
            DeleteRejected::UnknownShop(id) => Self::NotFound(format!("shop {id}")),
            DeleteRejected::InProgress(_) => Self::Conflict(err.to_string()),
            DeleteRejected::NotAdmin => Self::BadRequest(err.to_string()),
        }
    }
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Data(_) => StatusCode::BAD_GATEWAY,
            Self::Render(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(self, Self::Data(_) | Self::Render(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if !self.is_server_error() {
            return (status, self.to_string()).into_response();
        }

        let event_id = sentry::capture_error(&self);
        tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");

        let body = if matches!(self, Self::Data(_)) {
            "Le service des boutiques est indisponible."
        } else {
            "Erreur interne du serveur."
        };
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Record a user action in the Sentry breadcrumb trail.
///
/// ```rust,ignore
/// add_breadcrumb("shops", "Requested shop deletion", [("shop_id", id.to_string())]);
/// ```
pub fn add_breadcrumb<'a, I>(category: &str, message: &str, data: I)
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data: data
            .into_iter()
            .map(|(key, value)| (key.to_owned(), serde_json::Value::String(value)))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use partner_shops_core::ShopId;

    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("shop 9".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Data(DataError::Unauthorized), StatusCode::BAD_GATEWAY),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_delete_rejections() {
        let id = ShopId::new(7);
        assert_eq!(
            AppError::from(DeleteRejected::UnknownShop(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DeleteRejected::InProgress(id)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(DeleteRejected::NotAdmin).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::NotFound("shop 7".to_string());
        assert_eq!(err.to_string(), "Not found: shop 7");
    }
}
