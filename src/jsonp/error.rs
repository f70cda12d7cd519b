//! Errors raised while applying JSON-P padding.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::jsonp::headers::{bad_request, BAD_REQUEST_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum JsonpError {
    /// A non-empty callback that is not a dotted identifier path.
    #[error("invalid callback name: {0:?}")]
    InvalidCallback(String),

    /// A urlencoded request body could not be buffered to look for a callback.
    #[error("failed to read form body: {0}")]
    FormBody(axum::Error),

    /// The downstream body failed while being drained for padding.
    #[error("failed to read response body: {0}")]
    Body(#[from] axum::Error),
}

impl IntoResponse for JsonpError {
    fn into_response(self) -> Response {
        match self {
            JsonpError::InvalidCallback(_) | JsonpError::FormBody(_) => {
                bad_request(BAD_REQUEST_MESSAGE)
            }
            JsonpError::Body(_) => {
                let mut response = Response::new(Body::from("Upstream response failed"));
                *response.status_mut() = StatusCode::BAD_GATEWAY;
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
                response
            }
        }
    }
}
