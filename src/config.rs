use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::allowlist::{default_telegram_networks, NetworkAllowlist};
use crate::error::GuardError;

/// Construction-time settings shared by the guard schemes.
///
/// This is a pure in-process configuration object: the crate reads no
/// environment variables and no flags. Hosts that keep their allowlist
/// in a config file can deserialize this struct directly; the networks
/// serialize as CIDR strings (`"149.154.160.0/20"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuardConfig {
    /// Networks webhook callers must originate from.
    ///
    /// Leaving the field out, or supplying an empty list, selects
    /// Telegram's published subnets at scheme construction.
    #[serde(default = "default_telegram_networks")]
    pub telegram_networks: Vec<Ipv4Net>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            telegram_networks: default_telegram_networks(),
        }
    }
}

impl GuardConfig {
    /// Create a new GuardConfig builder.
    pub fn builder() -> GuardConfigBuilder {
        GuardConfigBuilder::new()
    }

    /// Build a config from textual CIDR blocks.
    ///
    /// Fails eagerly on the first entry that is not valid IPv4 CIDR
    /// notation.
    pub fn from_cidrs<I, S>(cidrs: I) -> Result<Self, GuardError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowlist = NetworkAllowlist::from_cidrs(cidrs)?;
        Ok(Self {
            telegram_networks: allowlist.networks().to_vec(),
        })
    }

    /// The allowlist this config describes.
    ///
    /// An empty network list resolves to the Telegram defaults here,
    /// which is why no constructed scheme can end up with an allowlist
    /// that rejects everything.
    #[must_use]
    pub fn allowlist(&self) -> NetworkAllowlist {
        NetworkAllowlist::new(self.telegram_networks.clone())
    }
}

/// Builder for GuardConfig
#[must_use = "builder does nothing until you call build()"]
#[derive(Debug, Default)]
pub struct GuardConfigBuilder {
    telegram_networks: Vec<Ipv4Net>,
}

impl GuardConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one allowed network.
    pub fn network(mut self, network: Ipv4Net) -> Self {
        self.telegram_networks.push(network);
        self
    }

    /// Add several allowed networks.
    pub fn networks<I>(mut self, networks: I) -> Self
    where
        I: IntoIterator<Item = Ipv4Net>,
    {
        self.telegram_networks.extend(networks);
        self
    }

    /// Add Telegram's published subnets alongside whatever else the
    /// builder holds. Useful for allowing a staging box to deliver
    /// test updates next to real Telegram traffic.
    pub fn telegram(mut self) -> Self {
        self.telegram_networks.extend(default_telegram_networks());
        self
    }

    /// Finish the config.
    ///
    /// A builder with no networks produces a config that selects the
    /// Telegram defaults at scheme construction.
    pub fn build(self) -> GuardConfig {
        GuardConfig {
            telegram_networks: self.telegram_networks,
        }
    }
}
