//! Ethereum infrastructure - execution engine boundary and Alloy implementation

mod engine;
mod provider;
mod trace;
mod wallet;

pub use engine::{ExecOutcome, ExecutionEngine, RawLog};
pub use provider::{GasSettings, ProviderConfig, RpcEngine};
pub use wallet::Wallet;
