//! Local signing wallet with a nonce mirror

use alloy::network::EthereumWallet;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;
use anyhow::{Context, Result};

/// A private key plus the nonce it will sign with next
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    nonce: u64,
}

impl Wallet {
    /// Fresh wallet with a random key
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
            nonce: 0,
        }
    }

    /// Wallet from a hex private key (with or without `0x`)
    pub fn from_private_key(key: &str) -> Result<Self> {
        let signer = key
            .trim()
            .parse::<PrivateKeySigner>()
            .context("Invalid private key")?;
        Ok(Self { signer, nonce: 0 })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Nonce the next transaction will use
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Adopt the on-chain nonce; called right before signing
    pub fn sync_nonce(&mut self, on_chain: u64) {
        if on_chain != self.nonce {
            tracing::debug!(address = %self.address(), local = self.nonce, on_chain, "nonce resynced");
        }
        self.nonce = on_chain;
    }

    /// Advance the local mirror after a transaction was mined
    pub fn bump_nonce(&mut self) {
        self.nonce += 1;
    }

    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
