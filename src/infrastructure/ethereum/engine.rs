//! Execution engine boundary
//!
//! The session never executes bytecode itself. It hands encoded calls and
//! transactions to an engine and consumes the outcome.

use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::Result;

use super::Wallet;

/// A raw log as emitted by the EVM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Result of a call or transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub success: bool,
    /// Return data, or revert data when `success` is false
    pub return_data: Bytes,
    /// Logs in emission order
    pub logs: Vec<RawLog>,
    /// Address of the contract created by a deployment
    pub created_address: Option<Address>,
}

/// Something that can execute EVM calls and transactions
///
/// Transport and node failures are returned as errors; an execution that
/// reverts is a successful round trip with `success == false`.
#[async_trait::async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Read-only call against `to`, returning the logs it would emit
    async fn call(&self, to: Address, data: Bytes) -> Result<ExecOutcome>;

    /// Sign and submit a transaction; `to == None` deploys `data`
    async fn transact(
        &self,
        wallet: &mut Wallet,
        to: Option<Address>,
        data: Bytes,
    ) -> Result<ExecOutcome>;

    /// Credit `address` with `amount` wei (dev nodes only)
    async fn fund(&self, address: Address, amount: U256) -> Result<()>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}
