//! HTTP façade over the messaging session.
//!
//! REST endpoints proxy to the session backend (sends, chat listing,
//! lifecycle management), expose the bridge's connection status and QR code,
//! and administer the webhook target. All routes except `/health` and
//! `/qr-code` require the `x-api-key` header.

pub mod auth;
pub mod bulk;
mod error;
mod handlers;
mod qr;
mod server;

pub use {
    error::ApiError,
    server::{AppState, build_gateway_app, start_gateway},
};
