//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace + timeout layers)
//!     → jsonp::JsonpLayer (callback check, padding)
//!     → server.rs forward handler → upstream application
//!     → Send to client
//! ```

pub mod server;

pub use server::{HttpServer, ServerError};
