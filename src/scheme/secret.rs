use std::net::Ipv4Addr;
use std::sync::Arc;

use ipnet::Ipv4Net;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use super::{network::OnlyTelegramNetwork, WebhookGuard};
use crate::config::GuardConfig;
use crate::error::GuardError;

/// Name of the path parameter carrying the webhook secret.
///
/// Routes guarded by [`OnlyTelegramNetworkWithSecret`] declare a
/// segment with this name, e.g. `/telegram/webhook/{secret}`. Requests
/// without the segment never match the route, so the guard only ever
/// sees it missing when the template itself forgot to declare it.
pub const SECRET_PATH_PARAM: &str = "secret";

/// Guard scheme that checks source network first, then a shared secret
/// carried in the `{secret}` path segment.
///
/// Registering a webhook URL like
/// `https://example.org/telegram/webhook/<random value>` lets the
/// handler verify that a caller knows the random value without
/// Telegram supporting any real authentication. The expected value is
/// stored as a [`SecretString`] to prevent accidental exposure in logs
/// or debug output.
///
/// The network check always runs first and short-circuits: a caller
/// outside the allowlist is turned away without the secret comparison
/// happening at all.
///
/// # Example
///
/// ```rust,no_run
/// use axum::{routing::post, Router};
/// use telegram_webhook_guard::{OnlyTelegramNetworkWithSecret, TelegramGuardLayer};
///
/// let guard = OnlyTelegramNetworkWithSecret::new("long-random-value");
/// let app: Router = Router::new()
///     .route("/telegram/webhook/{secret}", post(|| async { "ok" }))
///     .route_layer(TelegramGuardLayer::new(guard));
/// ```
#[derive(Debug, Clone)]
pub struct OnlyTelegramNetworkWithSecret {
    network: OnlyTelegramNetwork,
    // Arc keeps the per-request clone taken by the middleware a
    // pointer bump instead of a secret copy.
    real_secret: Arc<SecretString>,
}

impl OnlyTelegramNetworkWithSecret {
    /// Scheme identifier used in generated API documentation.
    pub const SCHEME_NAME: &'static str = "only_telegram_network_with_secret";

    /// Human-readable description of what the scheme enforces.
    pub const SCHEME_DESCRIPTION: &'static str =
        "Request must originate from one of Telegram's published webhook subnets \
         and carry the expected secret in its `{secret}` path segment";

    /// Guard over Telegram's published subnets with the given expected
    /// secret.
    ///
    /// The secret is required; pick a long random value and embed the
    /// same value in the URL registered with `setWebhook`.
    #[must_use]
    pub fn new(real_secret: impl Into<SecretString>) -> Self {
        Self {
            network: OnlyTelegramNetwork::new(),
            real_secret: Arc::new(real_secret.into()),
        }
    }

    /// Guard over custom networks; an empty list selects the Telegram
    /// defaults.
    #[must_use]
    pub fn with_networks(real_secret: impl Into<SecretString>, networks: Vec<Ipv4Net>) -> Self {
        Self {
            network: OnlyTelegramNetwork::with_networks(networks),
            real_secret: Arc::new(real_secret.into()),
        }
    }

    /// Guard configured from a [`GuardConfig`].
    #[must_use]
    pub fn with_config(real_secret: impl Into<SecretString>, config: &GuardConfig) -> Self {
        Self {
            network: OnlyTelegramNetwork::with_config(config),
            real_secret: Arc::new(real_secret.into()),
        }
    }

    /// Check the caller's source address, exactly like
    /// [`OnlyTelegramNetwork::authorize_by_network`].
    pub fn authorize_by_network(&self, peer_host: Option<&str>) -> Result<Ipv4Addr, GuardError> {
        self.network.authorize_by_network(peer_host)
    }

    /// Compare a candidate against the expected secret.
    ///
    /// Constant-time over byte content. Length is allowed to leak: the
    /// candidate arrives in the URL path, where its length is public
    /// anyway.
    pub fn authorize_by_secret(&self, candidate: &str) -> Result<(), GuardError> {
        if secrets_match(candidate, self.real_secret.expose_secret()) {
            Ok(())
        } else {
            tracing::debug!(
                scheme = Self::SCHEME_NAME,
                "webhook secret comparison failed"
            );
            Err(GuardError::SecretMismatch)
        }
    }
}

impl WebhookGuard for OnlyTelegramNetworkWithSecret {
    fn scheme_name(&self) -> &'static str {
        Self::SCHEME_NAME
    }

    fn scheme_description(&self) -> &'static str {
        Self::SCHEME_DESCRIPTION
    }

    fn requires_secret(&self) -> bool {
        true
    }

    /// Network first, then secret.
    ///
    /// The `?` on the network check is the ordering guarantee: an
    /// out-of-network caller is rejected before the secret, or even
    /// its presence, is looked at.
    fn authorize(
        &self,
        peer_host: Option<&str>,
        path_secret: Option<&str>,
    ) -> Result<Ipv4Addr, GuardError> {
        let addr = self.authorize_by_network(peer_host)?;

        // A missing candidate here means the route template never
        // declared a `{secret}` segment, which only the deployer can
        // fix.
        let candidate = path_secret.ok_or(GuardError::MissingSecretSegment)?;
        self.authorize_by_secret(candidate)?;

        Ok(addr)
    }
}

/// Constant-time comparison to prevent timing attacks
///
/// Uses the `subtle` crate which provides compiler-optimization-resistant
/// constant-time operations, so an attacker cannot walk the secret
/// byte-by-byte from response timing.
fn secrets_match(candidate: &str, real: &str) -> bool {
    if candidate.len() != real.len() {
        return false;
    }

    candidate.as_bytes().ct_eq(real.as_bytes()).into()
}
