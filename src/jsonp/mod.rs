//! JSON-P response padding.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → callback.rs (read `callback` from the query, else a urlencoded form body;
//!                    validate identifier path)
//!         → invalid: headers.rs builds 400 Bad Request, downstream never runs
//!     → layer.rs (invoke wrapped service exactly once)
//!     → detect.rs (is the response application/json with a body-bearing status?)
//!     → pad.rs (drain body once, escape U+2028/U+2029, wrap as `cb(...)`)
//!     → headers.rs (json → javascript, recompute Content-Length)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Response bodies stay streaming unless padding is actually required
//! - Request bodies are only buffered for small urlencoded forms, and the
//!   same bytes are handed downstream
//! - Callback grammar checked before any downstream work
//! - Content-Type rewrite is a literal first-occurrence substitution

pub mod callback;
pub mod detect;
pub mod error;
pub mod headers;
pub mod layer;
pub mod pad;

pub use callback::{
    extract_callback, extract_form_callback, has_callback, is_form_urlencoded, is_valid_callback,
    DEFAULT_CALLBACK_PARAM,
};
pub use detect::{carries_body, is_json};
pub use error::JsonpError;
pub use headers::{bad_request, BAD_REQUEST_MESSAGE};
pub use layer::{jsonp_middleware, JsonpLayer, JsonpService};
pub use pad::{pad, pad_body, SeparatorEscaper};
