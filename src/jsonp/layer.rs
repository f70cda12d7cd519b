//! JSON-P middleware: a tower `Layer` and an axum `from_fn` handler.
//!
//! Both share [`process`], which runs the per-request state machine:
//! resolve and validate callback, invoke downstream once, detect JSON, pad.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{self, header},
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError,
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::config::JsonpConfig;
use crate::jsonp::callback::{
    extract_callback, extract_form_callback, is_form_urlencoded, is_valid_callback,
};
use crate::jsonp::detect::{carries_body, is_json};
use crate::jsonp::error::JsonpError;
use crate::jsonp::headers::{refresh_content_length, rewrite_content_type};
use crate::jsonp::pad::pad_body;

/// Layer that adds JSON-P padding to the wrapped service.
#[derive(Debug, Clone)]
pub struct JsonpLayer {
    config: Arc<JsonpConfig>,
}

impl JsonpLayer {
    /// Reads the callback from the `callback` parameter.
    pub fn new() -> Self {
        Self::from_config(&JsonpConfig::default())
    }

    /// Reads the callback from a custom parameter.
    pub fn with_param(param: impl Into<String>) -> Self {
        let config = JsonpConfig {
            callback_param: param.into(),
            ..JsonpConfig::default()
        };
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_config(config: &JsonpConfig) -> Self {
        Self {
            config: Arc::new(config.clone()),
        }
    }
}

impl Default for JsonpLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for JsonpLayer {
    type Service = JsonpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonpService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`JsonpLayer`].
#[derive(Debug, Clone)]
pub struct JsonpService<S> {
    inner: S,
    config: Arc<JsonpConfig>,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for JsonpService<S>
where
    S: Service<Request, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: HttpBody<Data = Bytes> + Send + 'static,
    ReqBody::Error: Into<BoxError>,
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<ReqBody>) -> Self::Future {
        // keep the instance poll_ready was driven on
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config.clone();
        let request = request.map(Body::new);

        Box::pin(async move { process(&config, request, move |req| inner.call(req)).await })
    }
}

/// `axum::middleware::from_fn_with_state` flavour of [`JsonpLayer`].
pub async fn jsonp_middleware(
    State(config): State<Arc<JsonpConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let result = process(&config, request, |req| async move {
        Ok::<_, Infallible>(next.run(req).await)
    })
    .await;

    match result {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

async fn process<ResBody, E, F, Fut>(
    config: &JsonpConfig,
    request: Request,
    invoke: F,
) -> Result<Response, E>
where
    F: FnOnce(Request) -> Fut,
    Fut: Future<Output = Result<http::Response<ResBody>, E>>,
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    let (callback, request) = match resolve_callback(config, request).await {
        Ok(resolved) => resolved,
        Err(e) => return Ok(e.into_response()),
    };

    let response = invoke(request).await?;

    let Some(callback) = callback else {
        return Ok(response.map(Body::new));
    };
    if !carries_body(response.status()) || !is_json(response.headers()) {
        return Ok(response.map(Body::new));
    }

    match pad_response(&callback, response).await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::warn!(callback = %callback, error = %e, "JSON-P padding failed");
            Ok(e.into_response())
        }
    }
}

/// Query callback first, then a urlencoded form body; rejects an invalid name.
async fn resolve_callback(
    config: &JsonpConfig,
    request: Request,
) -> Result<(Option<String>, Request), JsonpError> {
    let (callback, request) = match extract_callback(&request, &config.callback_param) {
        Some(name) => (Some(name), request),
        None => form_callback(config, request).await?,
    };

    match callback {
        Some(name) if !is_valid_callback(&name) => {
            tracing::warn!(
                callback = %name,
                path = %request.uri().path(),
                "Rejecting request with invalid JSON-P callback"
            );
            Err(JsonpError::InvalidCallback(name))
        }
        callback => Ok((callback, request)),
    }
}

/// Buffers a small urlencoded body to read the callback, then hands the same
/// bytes back as the request body.
async fn form_callback(
    config: &JsonpConfig,
    request: Request,
) -> Result<(Option<String>, Request), JsonpError> {
    let limit = config.max_form_bytes;
    let oversized = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .is_some_and(|len| len > limit);

    if limit == 0 || oversized || !is_form_urlencoded(request.headers()) {
        return Ok((None, request));
    }

    let (parts, body) = request.into_parts();
    let form = axum::body::to_bytes(body, limit).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to buffer form body");
        JsonpError::FormBody(e)
    })?;

    let callback = extract_form_callback(&form, &config.callback_param);
    Ok((callback, Request::from_parts(parts, Body::from(form))))
}

async fn pad_response<ResBody>(
    callback: &str,
    response: http::Response<ResBody>,
) -> Result<Response, JsonpError>
where
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    let (mut parts, body) = response.into_parts();
    let padded = pad_body(callback, body).await?;

    rewrite_content_type(&mut parts.headers);
    refresh_content_length(&mut parts.headers, padded.len());

    tracing::debug!(
        callback = %callback,
        status = %parts.status,
        len = padded.len(),
        "Padded JSON response"
    );

    Ok(Response::from_parts(parts, Body::from(padded)))
}
