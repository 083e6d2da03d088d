//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Build directory scanning and ABI encoding/decoding using alloy-dyn-abi
//! - The execution engine boundary and its JSON-RPC adapter

pub mod abi;
pub mod ethereum;

pub use abi::ArtifactScanner;
pub use ethereum::{
    ExecOutcome, ExecutionEngine, GasSettings, ProviderConfig, RawLog, RpcEngine, Wallet,
};
