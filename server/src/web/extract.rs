use axum::{
    async_trait,
    body::{Bytes, HttpBody},
    extract::FromRequest,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    BoxError,
};
use serde::Deserialize;
use thiserror::Error;

use super::error::Error;

/// Urlencoded form body. axum's own extractor sits on `serde_urlencoded`,
/// which cannot parse the `genres[]` sequence fields, so this one goes
/// through `serde_qs` instead.
pub struct Form<T>(pub T);

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid mime type, expected application/x-www-form-urlencoded")]
    Mime,
    #[error("Could not read body bytes: {}", .0)]
    BodyRead(#[from] axum::extract::rejection::BytesRejection),
    #[error("Invalid form data: {}", .0)]
    Data(String),
}

impl FormError {
    pub fn status(&self) -> StatusCode {
        match self {
            FormError::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FormError::Mime | FormError::Data(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        Error::from(self).into_response()
    }
}

#[async_trait]
impl<S, B, T> FromRequest<S, B> for Form<T>
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
    S: Send + Sync,
    T: for<'de> Deserialize<'de> + Send,
{
    type Rejection = FormError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        if !form_content_type(req.headers()) {
            return Err(FormError::Mime);
        }
        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_qs::Config::new(5, false)
            .deserialize_bytes(&bytes)
            .map_err(|e| FormError::Data(e.to_string()))?;
        Ok(Form(value))
    }
}

fn form_content_type(headers: &HeaderMap) -> bool {
    let content_type = if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        content_type
    } else {
        return false;
    };

    let content_type = if let Ok(content_type) = content_type.to_str() {
        content_type
    } else {
        return false;
    };

    let mime = if let Ok(mime) = content_type.parse::<mime::Mime>() {
        mime
    } else {
        return false;
    };

    mime.type_() == mime::APPLICATION && mime.subtype() == "x-www-form-urlencoded"
}
