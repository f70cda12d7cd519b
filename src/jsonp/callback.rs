//! Callback extraction and validation.
//!
//! # Design Decisions
//! - The URI query is read first; a urlencoded form body is only consulted
//!   when the query carries no callback
//! - Grammar is `IDENT ('.' IDENT)*` with `IDENT = [A-Za-z_$][A-Za-z0-9_$]*`
//! - Hand-written matcher, anchored at both ends, no regex

use axum::http::{header, HeaderMap, Request};

/// Query parameter consulted when no other name is configured.
pub const DEFAULT_CALLBACK_PARAM: &str = "callback";

const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Returns the decoded value of `param` if the query carries it with a non-empty value.
///
/// When the parameter is repeated the last occurrence wins.
pub fn extract_callback<B>(request: &Request<B>, param: &str) -> Option<String> {
    let query = request.uri().query()?;
    find_param(query.as_bytes(), param)
}

/// Same lookup as [`extract_callback`], over a urlencoded form body.
pub fn extract_form_callback(form: &[u8], param: &str) -> Option<String> {
    find_param(form, param)
}

/// True iff the request body is declared as `application/x-www-form-urlencoded`.
pub fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_MEDIA_TYPE))
        .unwrap_or(false)
}

fn find_param(encoded: &[u8], param: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .filter(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .last()
        .filter(|value| !value.is_empty())
}

/// True iff the request asks for a (non-empty) callback.
pub fn has_callback<B>(request: &Request<B>, param: &str) -> bool {
    extract_callback(request, param).is_some()
}

/// True iff `name` is a dotted JavaScript identifier path such as `foo.bar.baz`.
pub fn is_valid_callback(name: &str) -> bool {
    name.split('.').all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
