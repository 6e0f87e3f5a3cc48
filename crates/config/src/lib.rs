//! # mood-config
//!
//! Configuration of the Mood dApp: the network the wallet must be on and the contract it talks
//! to.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, address};
use figment::{
    Figment, Provider,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

pub mod error;
pub use error::ExtractConfigError;

mod network;
pub use network::{NativeCurrency, NetworkRequirement};

// reexport so consumers can layer their own providers on top of `Config::figment()`
pub use alloy_chains::NamedChain;
pub use figment;

/// The on-chain Mood contract the dApp reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTarget {
    /// Deployment address on the configured network.
    pub address: Address,
}

impl ContractTarget {
    /// The Mood contract deployed on Sepolia.
    pub const SEPOLIA_MOOD: Address = address!("0xDDD7c9fE9d3c480524C52CB2AfE0150d06E7f2B7");
}

impl Default for ContractTarget {
    fn default() -> Self {
        Self { address: Self::SEPOLIA_MOOD }
    }
}

/// Mood dApp configuration.
///
/// # Defaults
///
/// [`Config::default()`] targets the Sepolia deployment of the Mood contract and never times out
/// wallet requests.
///
/// # Sources
///
/// [`Config::load()`] starts from the defaults and merges, in order of increasing precedence:
///
///   * the TOML file named by `MOOD_CONFIG`, or `mood.toml` in the working directory
///   * `MOOD_`-prefixed environment variables, with `__` separating nested keys, e.g.
///     `MOOD_REQUEST_TIMEOUT=30` or `MOOD_CONTRACT__ADDRESS=0x..`
///
/// The `network` table is all or nothing: when present it must describe the chain completely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The network every contract call must run on.
    pub network: NetworkRequirement,
    /// The contract behind `getMood`/`setMood`.
    pub contract: ContractTarget,
    /// RPC endpoint for unauthenticated reads. Falls back to the first of `network.rpc_urls`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Upper bound, in seconds, on any single wallet request.
    ///
    /// `None` waits indefinitely, which is what a wallet approval dialog needs if the user is
    /// expected to take their time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

impl Config {
    /// The default config file name.
    pub const FILE_NAME: &'static str = "mood.toml";

    /// Environment variable prefix.
    pub const ENV_PREFIX: &'static str = "MOOD_";

    /// Environment variable that overrides the config file location.
    pub const CONFIG_PATH_ENV: &'static str = "MOOD_CONFIG";

    /// Loads the current `Config`.
    ///
    /// See [`figment`](Self::figment) for the merged sources.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Attempts to extract a `Config` from `provider`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use figment::providers::{Format, Toml};
    /// use mood_config::Config;
    ///
    /// // Use the default `Figment`, but allow values from `other.toml` to supersede its values.
    /// let figment = Config::figment().merge(Toml::file("other.toml"));
    ///
    /// let config = Config::try_from(figment);
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)
    }

    /// Returns the [`Figment`] with defaults, the TOML file and the environment merged.
    ///
    /// A `network` given in the file or the environment replaces the default network as a whole
    /// instead of being merged into it, so a redefined chain never inherits Sepolia's currency or
    /// explorers.
    pub fn figment() -> Figment {
        let overrides = Figment::new()
            .merge(Toml::file(Self::config_path()))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["CONFIG"]).split("__"));

        let Self { network, contract, .. } = Self::default();
        let mut figment = Figment::from(Serialized::default("contract", contract));
        if !overrides.contains("network") {
            figment = figment.merge(Serialized::default("network", network));
        }
        figment.merge(overrides)
    }

    /// The config file location, honoring [`Self::CONFIG_PATH_ENV`].
    pub fn config_path() -> PathBuf {
        std::env::var_os(Self::CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME))
    }

    /// The endpoint used for unauthenticated contract reads.
    pub fn read_rpc_url(&self) -> Option<&str> {
        self.rpc_url.as_deref().or_else(|| self.network.default_rpc_url())
    }

    /// The configured wallet request timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }
}
