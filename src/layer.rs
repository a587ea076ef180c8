//! Route middleware that runs a guard scheme before the handler.
//!
//! Apply with [`Router::route_layer`](axum::Router::route_layer) so the
//! guard only runs for routes that actually matched; a plain `layer`
//! would also shield the 404 fallback, where no path parameters exist.

use axum::{
    extract::{ConnectInfo, FromRequestParts, RawPathParams, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tower::{Layer, Service};

use crate::scheme::{WebhookGuard, SECRET_PATH_PARAM};

/// Tower layer enforcing a [`WebhookGuard`] scheme.
///
/// The peer address comes from the [`ConnectInfo`] request extension,
/// which is what the server itself knows about the connection's remote
/// end; forwarding headers are deliberately ignored, so serve the
/// router with
/// [`into_make_service_with_connect_info`](axum::Router::into_make_service_with_connect_info)
/// (or restore `ConnectInfo` yourself behind a trusted proxy). Without
/// it every request is rejected as a server misconfiguration.
///
/// For secret-checking schemes the candidate value is read from the
/// matched route's `{secret}` path parameter. The request body is never
/// touched.
#[derive(Debug, Clone)]
pub struct TelegramGuardLayer<G> {
    guard: G,
}

impl<G: WebhookGuard> TelegramGuardLayer<G> {
    /// Wrap routes with the given guard scheme.
    pub fn new(guard: G) -> Self {
        Self { guard }
    }
}

impl<S, G: WebhookGuard> Layer<S> for TelegramGuardLayer<G> {
    type Service = TelegramGuardService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        TelegramGuardService {
            inner,
            guard: self.guard.clone(),
        }
    }
}

/// Tower service produced by [`TelegramGuardLayer`].
#[derive(Debug, Clone)]
pub struct TelegramGuardService<S, G> {
    inner: S,
    guard: G,
}

impl<S, G> Service<Request> for TelegramGuardService<S, G>
where
    S: Service<Request> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
    G: WebhookGuard,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let guard = self.guard.clone();
        let mut svc = self.inner.clone();

        // Connection-level peer only. Trusting X-Forwarded-For here
        // would let any host on the internet claim a Telegram address.
        let peer = req
            .extensions()
            .get::<ConnectInfo<std::net::SocketAddr>>()
            .map(|addr| addr.ip().to_string());

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let secret = if guard.requires_secret() {
                raw_path_secret(&mut parts).await
            } else {
                None
            };

            match guard.authorize(peer.as_deref(), secret.as_deref()) {
                Ok(_) => {
                    let response = svc.call(Request::from_parts(parts, body)).await?;
                    Ok(response.into_response())
                }
                Err(error) => Ok(error.into_response()),
            }
        })
    }
}

/// Pull the `{secret}` path parameter out of the matched route, if the
/// template bound one. Raw lookup by name, no type-level
/// deserialization; the guard's comparison decides equality.
pub(crate) async fn raw_path_secret(parts: &mut Parts) -> Option<String> {
    let params = RawPathParams::from_request_parts(parts, &()).await.ok()?;
    params
        .iter()
        .find(|(name, _)| *name == SECRET_PATH_PARAM)
        .map(|(_, value)| value.to_owned())
}
