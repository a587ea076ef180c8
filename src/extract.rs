use std::future::Future;
use std::marker::PhantomData;
use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

use crate::error::GuardError;
use crate::layer::raw_path_secret;
use crate::scheme::WebhookGuard;

/// Axum extractor that runs a guard scheme in handler position.
///
/// Alternative to [`TelegramGuardLayer`](crate::TelegramGuardLayer)
/// for handlers that want the validated caller address, or for routers
/// where only some handlers are guarded. The scheme instance is found
/// in the request extensions, so register it once on the router:
///
/// ```rust,no_run
/// use axum::{routing::post, Extension, Router};
/// use telegram_webhook_guard::{Guarded, OnlyTelegramNetworkWithSecret};
///
/// async fn webhook(guard: Guarded<OnlyTelegramNetworkWithSecret>) -> &'static str {
///     tracing::debug!(peer = %guard.peer(), "update received");
///     "ok"
/// }
///
/// let scheme = OnlyTelegramNetworkWithSecret::new("long-random-value");
/// let app: Router = Router::new()
///     .route("/telegram/webhook/{secret}", post(webhook))
///     .layer(Extension(scheme));
/// ```
///
/// Rejections convert to the same responses the layer produces; using
/// one or the other is not observable on the wire.
pub struct Guarded<G: WebhookGuard> {
    peer: Ipv4Addr,
    _scheme: PhantomData<fn() -> G>,
}

impl<G: WebhookGuard> Guarded<G> {
    /// The validated caller address.
    #[must_use]
    pub fn peer(&self) -> Ipv4Addr {
        self.peer
    }
}

impl<G, S> FromRequestParts<S> for Guarded<G>
where
    G: WebhookGuard,
    S: Send + Sync,
{
    type Rejection = GuardError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        Box::pin(async move {
            let guard = parts
                .extensions
                .get::<G>()
                .ok_or(GuardError::SchemeNotRegistered)?
                .clone();

            let peer = parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|addr| addr.ip().to_string());

            let secret = if guard.requires_secret() {
                raw_path_secret(parts).await
            } else {
                None
            };

            let peer = guard.authorize(peer.as_deref(), secret.as_deref())?;

            Ok(Self {
                peer,
                _scheme: PhantomData,
            })
        })
    }
}
