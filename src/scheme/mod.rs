//! The guard schemes.
//!
//! Two variants mirror how Telegram authenticates webhook deliveries:
//! [`OnlyTelegramNetwork`] checks the caller's source address against
//! an allowlist, and [`OnlyTelegramNetworkWithSecret`] additionally
//! compares a `{secret}` path segment against the deployer's expected
//! value in constant time. Both run synchronously before the handler
//! and hold no mutable state, so a single instance is shared freely
//! across in-flight requests.

mod network;
mod secret;

pub use network::OnlyTelegramNetwork;
pub use secret::{OnlyTelegramNetworkWithSecret, SECRET_PATH_PARAM};

use std::net::Ipv4Addr;

use crate::error::GuardError;

/// A pre-handler check for webhook requests.
///
/// Implementations decide whether a request may reach its handler,
/// given what the server knows about the connection's remote end and,
/// for secret-checking schemes, the raw `{secret}` path segment. The
/// trait is object-free and synchronous: the whole check is CPU-bound
/// comparison work.
///
/// Both the [`TelegramGuardLayer`](crate::TelegramGuardLayer)
/// middleware and the [`Guarded`](crate::Guarded) extractor drive
/// implementations of this trait.
pub trait WebhookGuard: Clone + Send + Sync + 'static {
    /// Scheme identifier advertised in generated API documentation.
    fn scheme_name(&self) -> &'static str;

    /// What the scheme enforces, in one sentence.
    fn scheme_description(&self) -> &'static str;

    /// Whether this scheme consumes the `{secret}` path segment.
    fn requires_secret(&self) -> bool {
        false
    }

    /// Run the check.
    ///
    /// Success yields the validated caller address; failure yields the
    /// rejection that decides the HTTP response.
    fn authorize(
        &self,
        peer_host: Option<&str>,
        path_secret: Option<&str>,
    ) -> Result<Ipv4Addr, GuardError>;
}

/// Resolve the textual peer host into an IPv4 address.
///
/// Absence means the server was never told who is calling, and a peer
/// that is not an IPv4 literal means the listener is not deployed the
/// way the allowlist assumes. Both are configuration-class rejections,
/// never caller faults.
pub(crate) fn resolve_peer_ipv4(peer_host: Option<&str>) -> Result<Ipv4Addr, GuardError> {
    let host = match peer_host {
        Some(host) if !host.is_empty() => host,
        _ => return Err(GuardError::PeerAddressUnavailable),
    };

    host.parse::<Ipv4Addr>()
        .map_err(|_| GuardError::PeerAddressNotIpv4(host.to_string()))
}
