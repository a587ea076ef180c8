//! IPv4 allowlist over CIDR blocks.
//!
//! Telegram publishes the subnets its webhook traffic originates from;
//! see <https://core.telegram.org/bots/webhooks#the-short-version>.
//! The allowlist answers one question only: does a given address fall
//! inside at least one configured block.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::GuardError;

/// Telegram's published webhook source subnets, as CIDR literals.
pub const TELEGRAM_SUBNETS: [&str; 2] = ["149.154.160.0/20", "91.108.4.0/22"];

/// The default allowlist contents: Telegram's published webhook
/// subnets, parsed.
#[must_use]
pub fn default_telegram_networks() -> Vec<Ipv4Net> {
    TELEGRAM_SUBNETS
        .iter()
        .map(|cidr| cidr.parse().expect("subnet literals should be valid CIDR"))
        .collect()
}

/// Set of IPv4 networks a webhook caller may originate from.
///
/// Construction never yields an empty set: callers that supply no
/// networks get [`default_telegram_networks`] instead, so a guard
/// cannot be accidentally configured to reject everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAllowlist {
    networks: Vec<Ipv4Net>,
}

impl NetworkAllowlist {
    /// Build an allowlist from parsed networks.
    ///
    /// An empty `networks` is replaced by the default Telegram subnets.
    #[must_use]
    pub fn new(networks: Vec<Ipv4Net>) -> Self {
        if networks.is_empty() {
            Self {
                networks: default_telegram_networks(),
            }
        } else {
            Self { networks }
        }
    }

    /// Allowlist over Telegram's published webhook subnets.
    #[must_use]
    pub fn telegram() -> Self {
        Self::new(default_telegram_networks())
    }

    /// Parse textual CIDR blocks into an allowlist.
    ///
    /// Any entry that is not valid IPv4 CIDR notation fails the whole
    /// construction, so configuration problems surface before the
    /// first request rather than during one. An empty iterator yields
    /// the default allowlist.
    pub fn from_cidrs<I, S>(cidrs: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let networks = cidrs
            .into_iter()
            .map(|cidr| {
                let cidr = cidr.as_ref();
                cidr.parse::<Ipv4Net>()
                    .map_err(|source| GuardError::InvalidNetwork {
                        value: cidr.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(networks))
    }

    /// Whether `addr` falls inside at least one configured block.
    ///
    /// Linear scan, first hit wins. Overlapping blocks are fine and
    /// the answer does not depend on their order.
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.networks.iter().any(|network| network.contains(&addr))
    }

    /// The blocks this allowlist was configured with.
    #[must_use]
    pub fn networks(&self) -> &[Ipv4Net] {
        &self.networks
    }
}

impl Default for NetworkAllowlist {
    fn default() -> Self {
        Self::telegram()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    // ============ Default allowlist tests ============

    #[test]
    fn test_default_accepts_telegram_addresses() {
        let allowlist = NetworkAllowlist::telegram();
        assert!(allowlist.contains(addr("149.154.160.1")));
        assert!(allowlist.contains(addr("91.108.4.1")));
    }

    #[test]
    fn test_default_rejects_outside_addresses() {
        let allowlist = NetworkAllowlist::telegram();
        assert!(!allowlist.contains(addr("8.8.8.8")));
        assert!(!allowlist.contains(addr("127.0.0.1")));
        assert!(!allowlist.contains(addr("10.1.2.3")));
    }

    #[test]
    fn test_block_boundaries_are_members() {
        let allowlist = NetworkAllowlist::telegram();
        // First and last address of 149.154.160.0/20.
        assert!(allowlist.contains(addr("149.154.160.0")));
        assert!(allowlist.contains(addr("149.154.175.255")));
        // First and last address of 91.108.4.0/22.
        assert!(allowlist.contains(addr("91.108.4.0")));
        assert!(allowlist.contains(addr("91.108.7.255")));
        // One past either end.
        assert!(!allowlist.contains(addr("149.154.176.0")));
        assert!(!allowlist.contains(addr("149.154.159.255")));
        assert!(!allowlist.contains(addr("91.108.8.0")));
        assert!(!allowlist.contains(addr("91.108.3.255")));
    }

    // ============ Construction tests ============

    #[test]
    fn test_empty_input_substitutes_defaults() {
        let allowlist = NetworkAllowlist::new(Vec::new());
        assert_eq!(allowlist, NetworkAllowlist::telegram());
        assert!(!allowlist.networks().is_empty());
    }

    #[test]
    fn test_custom_networks_replace_defaults() {
        let allowlist = NetworkAllowlist::new(vec!["10.0.0.0/8".parse().unwrap()]);
        assert!(allowlist.contains(addr("10.1.2.3")));
        assert!(!allowlist.contains(addr("149.154.160.1")));
    }

    #[test]
    fn test_from_cidrs_parses_each_entry() {
        let allowlist = NetworkAllowlist::from_cidrs(["10.0.0.0/8", "192.168.0.0/16"]).unwrap();
        assert_eq!(allowlist.networks().len(), 2);
        assert!(allowlist.contains(addr("192.168.1.1")));
    }

    #[test]
    fn test_from_cidrs_rejects_bad_entry() {
        let result = NetworkAllowlist::from_cidrs(["10.0.0.0/8", "not-a-network"]);
        match result {
            Err(GuardError::InvalidNetwork { value, .. }) => {
                assert_eq!(value, "not-a-network");
            }
            other => panic!("expected InvalidNetwork, got {other:?}"),
        }
    }

    #[test]
    fn test_from_cidrs_rejects_bare_address() {
        // A bare address without a prefix length is not a network.
        assert!(NetworkAllowlist::from_cidrs(["149.154.160.1"]).is_err());
    }

    #[test]
    fn test_from_cidrs_empty_yields_defaults() {
        let allowlist = NetworkAllowlist::from_cidrs(std::iter::empty::<&str>()).unwrap();
        assert_eq!(allowlist, NetworkAllowlist::telegram());
    }

    #[test]
    fn test_overlapping_blocks_order_independent() {
        let wide: Ipv4Net = "10.0.0.0/8".parse().unwrap();
        let narrow: Ipv4Net = "10.1.0.0/16".parse().unwrap();
        let a = NetworkAllowlist::new(vec![wide, narrow]);
        let b = NetworkAllowlist::new(vec![narrow, wide]);
        assert_eq!(a.contains(addr("10.1.2.3")), b.contains(addr("10.1.2.3")));
        assert!(a.contains(addr("10.200.0.1")));
        assert!(b.contains(addr("10.200.0.1")));
    }
}
