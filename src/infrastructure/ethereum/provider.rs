//! Alloy-backed execution engine
//!
//! Read-only calls go through `debug_traceCall` with the call tracer so the
//! logs a view function emits are captured without mining anything.

use std::path::PathBuf;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::trace::geth::{
    CallConfig, GethDebugBuiltInTracerType, GethDebugTracerType, GethDebugTracingOptions,
    GethTrace,
};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};

use super::trace::convert_call_trace;
use super::{ExecOutcome, ExecutionEngine, RawLog, Wallet};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick the transport from the shape of `url`
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.starts_with("ws://") || url.starts_with("wss://") {
            return ProviderConfig::WebSocket(url.to_string());
        }
        #[cfg(unix)]
        if !url.contains("://") {
            return ProviderConfig::Ipc(PathBuf::from(url));
        }
        ProviderConfig::Http(url.to_string())
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// Gas parameters for every signed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasSettings {
    pub gas_limit: u64,
    /// Legacy gas price in wei; `None` asks the node
    pub gas_price: Option<u128>,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            gas_limit: 2_000_000,
            gas_price: None,
        }
    }
}

/// Execution engine backed by a JSON-RPC node
pub struct RpcEngine {
    provider: DynProvider,
    endpoint: String,
    gas: GasSettings,
}

impl RpcEngine {
    /// Connect to the node described by `config`
    pub async fn connect(config: ProviderConfig, gas: GasSettings) -> Result<Self> {
        let endpoint = config.display();
        let provider = match config {
            ProviderConfig::Http(url) => {
                let rpc_url = url.parse().context("Invalid HTTP URL")?;
                ProviderBuilder::new().connect_http(rpc_url).erased()
            }
            ProviderConfig::WebSocket(url) => ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?
                .erased(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => {
                use alloy::providers::IpcConnect;
                let ipc = IpcConnect::new(path.to_string_lossy().to_string());
                ProviderBuilder::new()
                    .connect_ipc(ipc)
                    .await
                    .context("Failed to create IPC provider")?
                    .erased()
            }
        };

        tracing::info!(%endpoint, "connected");
        Ok(Self {
            provider,
            endpoint,
            gas,
        })
    }

    async fn trace_call(&self, request: &TransactionRequest) -> Result<ExecOutcome> {
        let options = GethDebugTracingOptions::default()
            .with_tracer(GethDebugTracerType::BuiltInTracer(
                GethDebugBuiltInTracerType::CallTracer,
            ))
            .with_call_config(CallConfig {
                with_log: Some(true),
                ..Default::default()
            });
        let trace: GethTrace = self
            .provider
            .raw_request("debug_traceCall".into(), (request, "latest", &options))
            .await
            .context("debug_traceCall failed")?;
        convert_call_trace(trace)
    }
}

#[async_trait::async_trait]
impl ExecutionEngine for RpcEngine {
    async fn call(&self, to: Address, data: Bytes) -> Result<ExecOutcome> {
        let request = TransactionRequest::default()
            .with_to(to)
            .with_input(data)
            .with_gas_limit(self.gas.gas_limit);
        self.trace_call(&request).await
    }

    async fn transact(
        &self,
        wallet: &mut Wallet,
        to: Option<Address>,
        data: Bytes,
    ) -> Result<ExecOutcome> {
        let from = wallet.address();
        let nonce = self
            .provider
            .get_transaction_count(from)
            .await
            .context("Failed to fetch nonce")?;
        wallet.sync_nonce(nonce);

        let gas_price = match self.gas.gas_price {
            Some(price) => price,
            None => self
                .provider
                .get_gas_price()
                .await
                .context("Failed to fetch gas price")?,
        };

        let mut request = TransactionRequest::default()
            .with_from(from)
            .with_nonce(wallet.nonce())
            .with_gas_limit(self.gas.gas_limit)
            .with_gas_price(gas_price);
        request = match to {
            Some(to) => request.with_to(to).with_input(data),
            None => request.with_deploy_code(data),
        };

        // Reverts are reported without spending a nonce.
        let simulated = self.trace_call(&request).await?;
        if !simulated.success {
            tracing::debug!(%from, "transaction would revert, not submitted");
            return Ok(simulated);
        }

        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .context("Failed to fetch chain id")?;
        let envelope = request
            .with_chain_id(chain_id)
            .build(&wallet.ethereum_wallet())
            .await
            .context("Failed to sign transaction")?;

        let receipt = self
            .provider
            .send_tx_envelope(envelope)
            .await
            .context("Failed to submit transaction")?
            .get_receipt()
            .await
            .context("Failed to fetch receipt")?;
        wallet.bump_nonce();

        tracing::debug!(
            hash = %receipt.transaction_hash,
            status = receipt.status(),
            "transaction mined"
        );

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| RawLog {
                address: log.inner.address,
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect();

        Ok(ExecOutcome {
            success: receipt.status(),
            return_data: if receipt.status() {
                simulated.return_data
            } else {
                Bytes::new()
            },
            logs,
            created_address: receipt.contract_address,
        })
    }

    async fn fund(&self, address: Address, amount: U256) -> Result<()> {
        let _: serde_json::Value = self
            .provider
            .raw_request("anvil_setBalance".into(), (address, amount))
            .await
            .context("anvil_setBalance failed")?;
        Ok(())
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
