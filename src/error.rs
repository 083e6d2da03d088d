//! Session error taxonomy

use alloy_primitives::Address;

/// Errors that abort a menu session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Construction ===
    #[error("malformed target {key}: {reason}")]
    MalformedTarget { key: String, reason: String },

    #[error("action requires a selector argument")]
    MissingSelector,

    #[error("action accepts a selector and an optional contract, got {0} arguments")]
    TooManyActionArgs(usize),

    #[error("expected {expected} for {field}, got {found}")]
    UnexpectedValue {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    // === Resolution ===
    #[error("no function fragment found for selector `{0}`")]
    UnknownSelector(String),

    #[error("unknown contract instance: {0}")]
    UnknownInstance(String),

    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error("{contract} has no function `{function}`")]
    UnknownFunction { contract: String, function: String },

    #[error("log emitted by unknown origin {0}")]
    UnknownOrigin(Address),

    #[error("{0} has no bytecode to deploy")]
    MissingBytecode(String),

    // === Execution ===
    #[error("{contract} reverted: {reason}")]
    Reverted { contract: String, reason: String },

    #[error("failed to encode call to {function}: {reason}")]
    Encode { function: String, reason: String },

    #[error("failed to decode event {event}: {reason}")]
    DecodeEvent { event: String, reason: String },

    #[error("target has no action: {menu}/{id}")]
    DeadEnd { menu: String, id: String },

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
