use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use super::{resolve_peer_ipv4, WebhookGuard};
use crate::allowlist::NetworkAllowlist;
use crate::config::GuardConfig;
use crate::error::GuardError;

/// Guard scheme that admits requests by source network alone.
///
/// Telegram does not sign webhook deliveries, so the baseline defence
/// is to only accept updates whose connection originates from the
/// subnets Telegram publishes. This scheme carries no secret; use
/// [`OnlyTelegramNetworkWithSecret`](super::OnlyTelegramNetworkWithSecret)
/// when the webhook URL embeds one.
///
/// # Example
///
/// ```rust,no_run
/// use axum::{routing::post, Router};
/// use telegram_webhook_guard::{OnlyTelegramNetwork, TelegramGuardLayer};
///
/// let app: Router = Router::new()
///     .route("/telegram/webhook", post(|| async { "ok" }))
///     .route_layer(TelegramGuardLayer::new(OnlyTelegramNetwork::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OnlyTelegramNetwork {
    allowlist: NetworkAllowlist,
}

impl OnlyTelegramNetwork {
    /// Scheme identifier used in generated API documentation.
    pub const SCHEME_NAME: &'static str = "only_telegram_network";

    /// Human-readable description of what the scheme enforces.
    pub const SCHEME_DESCRIPTION: &'static str =
        "Request must originate from one of Telegram's published webhook subnets";

    /// Guard over Telegram's published subnets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowlist: NetworkAllowlist::telegram(),
        }
    }

    /// Guard over custom networks.
    ///
    /// An empty list selects the Telegram defaults; there is no way to
    /// construct a guard that admits nobody.
    #[must_use]
    pub fn with_networks(networks: Vec<Ipv4Net>) -> Self {
        Self {
            allowlist: NetworkAllowlist::new(networks),
        }
    }

    /// Guard configured from a [`GuardConfig`].
    #[must_use]
    pub fn with_config(config: &GuardConfig) -> Self {
        Self {
            allowlist: config.allowlist(),
        }
    }

    /// The allowlist this guard consults.
    #[must_use]
    pub fn allowlist(&self) -> &NetworkAllowlist {
        &self.allowlist
    }

    /// Check the caller's source address.
    ///
    /// Resolves `peer_host` to an IPv4 address (configuration-class
    /// rejection when that is impossible), then requires allowlist
    /// membership. Returns the validated address on success.
    pub fn authorize_by_network(&self, peer_host: Option<&str>) -> Result<Ipv4Addr, GuardError> {
        let addr = resolve_peer_ipv4(peer_host)?;

        if self.allowlist.contains(addr) {
            Ok(addr)
        } else {
            tracing::debug!(
                peer = %addr,
                scheme = Self::SCHEME_NAME,
                "webhook caller outside allowed networks"
            );
            Err(GuardError::IpNotAllowed)
        }
    }
}

impl WebhookGuard for OnlyTelegramNetwork {
    fn scheme_name(&self) -> &'static str {
        Self::SCHEME_NAME
    }

    fn scheme_description(&self) -> &'static str {
        Self::SCHEME_DESCRIPTION
    }

    fn authorize(
        &self,
        peer_host: Option<&str>,
        _path_secret: Option<&str>,
    ) -> Result<Ipv4Addr, GuardError> {
        self.authorize_by_network(peer_host)
    }
}
