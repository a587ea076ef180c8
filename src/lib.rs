//! Telegram webhook guard - request authentication for bot webhook routes
//!
//! Telegram does not sign webhook deliveries. What its docs offer instead
//! are the source subnets webhook traffic originates from and the advice
//! to bury a secret in the webhook path. This crate packages both checks
//! for Axum as a tower layer and an extractor, so a bot server can mount
//! them without writing address-parsing or comparison code itself.
//!
//! # Features
//!
//! - **Network allowlist**: callers must originate from Telegram's
//!   published subnets (overridable per deployment)
//! - **Path secret**: constant-time comparison of a `{secret}` path segment
//! - **Two mounting styles**: [`TelegramGuardLayer`] for whole routes,
//!   [`Guarded`] for individual handlers
//! - **Fail closed**: a server that cannot see its peers answers 500,
//!   never 200
//! - **OpenAPI**: security scheme registration with utoipa (feature
//!   `openapi`)
//! - **Testing**: scenario helpers that fake the peer address, no sockets
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{routing::post, Router};
//! use std::net::SocketAddr;
//! use telegram_webhook_guard::{OnlyTelegramNetworkWithSecret, TelegramGuardLayer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let scheme = OnlyTelegramNetworkWithSecret::new("long-random-secret");
//!
//!     let app = Router::new()
//!         .route("/webhook/{secret}", post(|| async { "ok" }))
//!         .route_layer(TelegramGuardLayer::new(scheme));
//!
//!     // The connect-info make-service is what records each caller's
//!     // address; without it every request is rejected with a 500.
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(
//!         listener,
//!         app.into_make_service_with_connect_info::<SocketAddr>(),
//!     )
//!     .await
//!     .unwrap();
//! }
//! ```

mod allowlist;
mod config;
mod error;
mod extract;
mod layer;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod scheme;
pub mod testing;

// Re-exports for public API
pub use allowlist::{default_telegram_networks, NetworkAllowlist, TELEGRAM_SUBNETS};
pub use config::{GuardConfig, GuardConfigBuilder};
pub use error::GuardError;
pub use extract::Guarded;
pub use layer::{TelegramGuardLayer, TelegramGuardService};
pub use scheme::{
    OnlyTelegramNetwork, OnlyTelegramNetworkWithSecret, WebhookGuard, SECRET_PATH_PARAM,
};
