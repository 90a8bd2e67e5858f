use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use super::extract::FormError;
use super::templates::ErrorTemplate;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error")]
    DbErr(#[from] DbErr),

    #[error("Not found")]
    NotFound(Option<DbErr>),

    #[error("Could not parse the submitted form: {0}")]
    Form(#[from] FormError),
    #[error("Could not render page: {0}")]
    Render(#[from] askama::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Form(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Error::NotFound(e) => tracing::debug!(error = ?e, "Page not found"),
            e => tracing::error!(error = %e, "Request failed"),
        }
        let detail = match &self {
            Error::Form(e) => Some(e.to_string()),
            _ => None,
        };
        let page = ErrorTemplate {
            flash: None,
            code: status.as_u16(),
            title: self.to_string(),
            detail,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            // rendering the error page failed as well, fall back to plain text
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}
