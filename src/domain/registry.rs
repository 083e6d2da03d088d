//! Contract registry - indexes functions, events and errors across artifacts

use std::collections::HashMap;
use std::sync::Arc;

use alloy_json_abi::{Error as AbiError, Event, Function};
use alloy_primitives::{Selector, B256};
use indexmap::IndexMap;

use super::ContractArtifact;

/// An ABI item together with the artifact that declared it
pub type Indexed<T> = (Arc<ContractArtifact>, T);

/// Registry of every loaded contract interface
///
/// Built once at startup and shared by reference for the whole session.
#[derive(Debug, Default, Clone)]
pub struct ContractRegistry {
    /// Artifacts by name, in registration order
    contracts: IndexMap<String, Arc<ContractArtifact>>,
    /// Functions by name and by `0x`-prefixed selector
    selectors: HashMap<String, Vec<Indexed<Function>>>,
    /// Events by topic hash
    events: HashMap<B256, Vec<Indexed<Event>>>,
    /// Custom errors by selector
    errors: HashMap<Selector, Vec<Indexed<AbiError>>>,
    /// Number of files scanned
    pub scanned_files: usize,
    /// Scan errors
    pub scan_errors: Vec<String>,
    /// Scan duration in milliseconds
    pub scan_ms: u128,
}

impl ContractRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact and index its interface
    pub fn add(&mut self, artifact: ContractArtifact) -> Arc<ContractArtifact> {
        let artifact = Arc::new(artifact);

        for function in artifact.abi.functions() {
            let entry = (artifact.clone(), function.clone());
            self.selectors
                .entry(function.name.clone())
                .or_default()
                .push(entry.clone());
            self.selectors
                .entry(selector_key(function.selector()))
                .or_default()
                .push(entry);
        }
        for event in artifact.abi.events().filter(|e| !e.anonymous) {
            self.events
                .entry(event.selector())
                .or_default()
                .push((artifact.clone(), event.clone()));
        }
        for error in artifact.abi.errors() {
            self.errors
                .entry(error.selector())
                .or_default()
                .push((artifact.clone(), error.clone()));
        }

        self.contracts
            .insert(artifact.name.clone(), artifact.clone());
        artifact
    }

    /// Resolve a selector token (function name or `0x` selector).
    ///
    /// Note: when several contracts declare the same token, the last one
    /// registered wins.
    pub fn resolve_selector(&self, token: &str) -> Option<&Indexed<Function>> {
        let key = if token.starts_with("0x") || token.starts_with("0X") {
            token.to_lowercase()
        } else {
            token.to_string()
        };
        self.selectors.get(&key).and_then(|matches| matches.last())
    }

    /// Event declared for a topic hash (first registered wins)
    pub fn event(&self, topic: &B256) -> Option<&Indexed<Event>> {
        self.events.get(topic).and_then(|matches| matches.first())
    }

    /// Custom error declared for a selector (first registered wins)
    pub fn error(&self, selector: Selector) -> Option<&Indexed<AbiError>> {
        self.errors.get(&selector).and_then(|matches| matches.first())
    }

    /// Look up an artifact by name
    pub fn contract(&self, name: &str) -> Option<&Arc<ContractArtifact>> {
        self.contracts.get(name)
    }

    /// Get the number of registered contracts
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

fn selector_key(selector: Selector) -> String {
    format!("0x{}", hex::encode(selector))
}
