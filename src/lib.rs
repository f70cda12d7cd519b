//! JSON-P gateway library.
//!
//! The [`jsonp`] module is usable on its own as a tower layer; the remaining
//! modules host it in front of an upstream HTTP application.

pub mod config;
pub mod http;
pub mod jsonp;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use jsonp::{jsonp_middleware, JsonpLayer, JsonpService};
