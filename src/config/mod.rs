use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;

/// A contract bound to an address that already exists on the node
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceSpec {
    pub name: String,
    pub address: String,
}

impl InstanceSpec {
    pub fn parsed_address(&self) -> Result<Address> {
        self.address
            .trim()
            .parse()
            .with_context(|| format!("invalid address for instance {}", self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node endpoint: http(s), ws(s) or an IPC path
    pub rpc: String,
    /// Directory scanned for compiled artifacts
    pub build_dir: PathBuf,
    /// Entry contract
    pub contract: String,
    /// Entry function
    pub function: String,
    /// Contracts deployed at startup; defaults to the entry contract
    pub deploy: Option<Vec<String>>,
    pub private_key: Option<String>,
    pub fund_wallet: bool,
    pub gas_limit: Option<u64>,
    /// Legacy gas price in wei
    pub gas_price: Option<u64>,
    /// Send non-view entry points as transactions
    pub transact: bool,
    pub instances: Vec<InstanceSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: "http://127.0.0.1:8545".to_string(),
            build_dir: PathBuf::from("build"),
            contract: "Home".to_string(),
            function: "menu".to_string(),
            deploy: None,
            private_key: None,
            fund_wallet: true,
            gas_limit: None,
            gas_price: None,
            transact: false,
            instances: Vec::new(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Contracts to deploy, in order
    pub fn deploy_list(&self) -> Vec<String> {
        match &self.deploy {
            Some(names) => names.clone(),
            None => vec![self.contract.clone()],
        }
    }
}

/// Load the config from the default location
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Load the config at `path`; missing or unreadable files give defaults
pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no config file");
            return Config::default();
        }
    };
    Config::parse(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
        Config::default()
    })
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("MENUCALL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("menucall").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("menucall").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "menucall", "menucall")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
