//! Contract artifacts and deployed instances

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes};

use crate::error::{Error, Result};

/// A compiled contract loaded from the build directory
#[derive(Debug, Clone, PartialEq)]
pub struct ContractArtifact {
    /// Contract name (artifact file stem)
    pub name: String,
    /// Parsed JSON ABI
    pub abi: JsonAbi,
    /// Deployment bytecode, absent for interfaces and abstract contracts
    pub bytecode: Option<Bytes>,
    /// File the ABI was read from
    pub source: PathBuf,
}

impl ContractArtifact {
    pub fn new(name: impl Into<String>, abi: JsonAbi) -> Self {
        Self {
            name: name.into(),
            abi,
            bytecode: None,
            source: PathBuf::new(),
        }
    }

    /// First function declared under `name`
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abi.function(name).and_then(|overloads| overloads.first())
    }
}

/// A deployed contract: an address plus the artifact describing it
#[derive(Debug, Clone)]
pub struct ContractInstance {
    pub address: Address,
    pub contract: Arc<ContractArtifact>,
}

impl ContractInstance {
    pub fn new(address: Address, contract: Arc<ContractArtifact>) -> Self {
        Self { address, contract }
    }

    pub fn name(&self) -> &str {
        &self.contract.name
    }

    /// Look up a function on this instance's ABI
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.contract
            .function(name)
            .ok_or_else(|| Error::UnknownFunction {
                contract: self.contract.name.clone(),
                function: name.to_string(),
            })
    }

    /// Find the local counterpart of a function resolved elsewhere:
    /// same selector first, then same name.
    pub fn counterpart(&self, fragment: &Function) -> Result<&Function> {
        let selector = fragment.selector();
        self.contract
            .abi
            .functions()
            .find(|f| f.selector() == selector)
            .map_or_else(|| self.function(&fragment.name), Ok)
    }
}

impl PartialEq for ContractInstance {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.contract.name == other.contract.name
    }
}

impl fmt::Display for ContractInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.contract.name, self.address)
    }
}

/// Known contract instances, addressable by name or address
#[derive(Debug, Default, Clone)]
pub struct Deployments {
    by_name: HashMap<String, ContractInstance>,
    by_address: HashMap<Address, ContractInstance>,
}

impl Deployments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance reachable by address only
    pub fn insert(&mut self, instance: ContractInstance) {
        self.by_address.insert(instance.address, instance);
    }

    /// Register an instance reachable by address and by (case-insensitive) name
    pub fn insert_named(&mut self, name: &str, instance: ContractInstance) {
        self.by_name.insert(name.to_lowercase(), instance.clone());
        self.insert(instance);
    }

    pub fn by_name(&self, name: &str) -> Option<&ContractInstance> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn by_address(&self, address: &Address) -> Option<&ContractInstance> {
        self.by_address.get(address)
    }

    /// Resolve a name-or-address token to an instance
    pub fn instance(&self, token: &str) -> Result<ContractInstance> {
        let token = token.trim();
        if let Ok(address) = token.parse::<Address>() {
            if let Some(instance) = self.by_address(&address) {
                return Ok(instance.clone());
            }
        }
        self.by_name(token)
            .cloned()
            .ok_or_else(|| Error::UnknownInstance(token.to_string()))
    }
}
