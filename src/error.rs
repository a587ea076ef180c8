use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Why a guard refused to let a request reach its handler.
///
/// Variants split into two HTTP classes. Configuration problems map to
/// `500 Internal Server Error`: everything only the deployer can fix,
/// such as a peer address that is missing or not IPv4, a guarded route
/// without its `{secret}` segment, an invalid allowlist literal, or a
/// scheme that was never registered. Authorization failures map to
/// `403 Forbidden`: a caller outside the allowed networks, or a secret
/// that does not match.
///
/// Response bodies are deliberately terse. The IP rejection carries the
/// fixed text `Bad IP address`; a secret mismatch carries no body at
/// all, so a probing caller cannot tell a near-miss from a far-miss.
/// Server-class bodies are static hints and never echo request data;
/// the full picture goes to the log instead.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// An allowlist entry was not valid IPv4 CIDR notation.
    #[error("invalid network `{value}` in webhook allowlist")]
    InvalidNetwork {
        /// The literal as supplied by configuration.
        value: String,
        #[source]
        source: ipnet::AddrParseError,
    },

    /// The server does not know the peer's address.
    ///
    /// Usually means the router was served without
    /// `into_make_service_with_connect_info`, or a fronting proxy was
    /// not set up to restore the real connection info.
    #[error("peer address unavailable; was the router served with connect info?")]
    PeerAddressUnavailable,

    /// The peer address is known but is not an IPv4 literal.
    ///
    /// Telegram delivers webhooks from IPv4 ranges, so an IPv6 peer
    /// means the listener is not deployed the way the allowlist
    /// assumes.
    #[error("peer address `{0}` is not IPv4")]
    PeerAddressNotIpv4(String),

    /// A secret-checking guard ran on a route whose template has no
    /// `{secret}` segment.
    #[error("guarded route template is missing its `{{secret}}` segment")]
    MissingSecretSegment,

    /// A guard extractor ran without its scheme registered on the
    /// router.
    #[error("webhook guard scheme not registered; add `Extension(scheme)` to the router")]
    SchemeNotRegistered,

    /// The caller's address is outside the configured allowlist.
    #[error("webhook caller address is outside the allowed networks")]
    IpNotAllowed,

    /// The `{secret}` path segment did not match the expected value.
    #[error("webhook secret mismatch")]
    SecretMismatch,
}

impl GuardError {
    /// HTTP status this rejection maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidNetwork { .. }
            | Self::PeerAddressUnavailable
            | Self::PeerAddressNotIpv4(_)
            | Self::MissingSecretSegment
            | Self::SchemeNotRegistered => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IpNotAllowed | Self::SecretMismatch => StatusCode::FORBIDDEN,
        }
    }

    /// Whether this rejection is a deployment problem rather than a
    /// caller being turned away.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidNetwork { .. }
                | Self::PeerAddressUnavailable
                | Self::PeerAddressNotIpv4(_)
                | Self::MissingSecretSegment
                | Self::SchemeNotRegistered
        )
    }

    /// Static response body for this rejection.
    pub(crate) const fn body_text(&self) -> &'static str {
        match self {
            Self::IpNotAllowed => "Bad IP address",
            // No detail on purpose: the body must not say which check
            // tripped.
            Self::SecretMismatch => "",
            Self::InvalidNetwork { .. } => "Webhook guard misconfigured",
            Self::PeerAddressUnavailable | Self::PeerAddressNotIpv4(_) => {
                "Could not determine webhook caller address"
            }
            Self::MissingSecretSegment => "Webhook route is missing its secret segment",
            Self::SchemeNotRegistered => "Webhook guard not registered",
        }
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Configuration failures are logged loudly: the terse body is
        // all the client sees, and the operator has to learn what to
        // fix from somewhere.
        if self.is_configuration() {
            tracing::error!(
                status = status.as_u16(),
                error = %self,
                "webhook guard rejected request due to misconfiguration"
            );
        }

        (status, self.body_text()).into_response()
    }
}
