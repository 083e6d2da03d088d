//! Target actions - selector resolution and menu response detection

use std::fmt;

use alloy_json_abi::Function;

use super::{ContractInstance, ContractRegistry, Deployments, LogValue};
use crate::error::{Error, Result};

/// A resolved function a target invokes next, bound to a contract instance
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub contract: ContractInstance,
    pub fragment: Function,
}

impl Action {
    /// Whether the function takes a menu response as its second parameter
    pub fn accepts_menu_response(&self) -> bool {
        is_menu_response(&self.fragment)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.contract.name(), self.fragment.signature())
    }
}

/// Resolves `Action` log arguments against the loaded contracts
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a ContractRegistry,
    deployments: &'a Deployments,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a ContractRegistry, deployments: &'a Deployments) -> Self {
        Self {
            registry,
            deployments,
        }
    }

    /// Build an action from its log arguments: a selector token, then an
    /// optional contract name or address overriding `default`.
    pub fn resolve(&self, args: &[LogValue], default: &ContractInstance) -> Result<Action> {
        let (selector, rest) = args.split_first().ok_or(Error::MissingSelector)?;
        if args.len() > 2 {
            return Err(Error::TooManyActionArgs(args.len()));
        }

        let token = selector_token(selector)?;
        let (_, fragment) = self
            .registry
            .resolve_selector(&token)
            .ok_or_else(|| Error::UnknownSelector(token.clone()))?;

        let contract = match rest.first() {
            Some(value) => self.deployments.instance(&instance_token(value)?)?,
            None => default.clone(),
        };

        Ok(Action {
            contract,
            fragment: fragment.clone(),
        })
    }
}

/// True for functions shaped `f(bytes32, (string,string)[], ...)`
pub fn is_menu_response(function: &Function) -> bool {
    let [token, response, ..] = function.inputs.as_slice() else {
        return false;
    };
    token.ty == "bytes32"
        && response.ty == "tuple[]"
        && response.components.len() == 2
        && response.components.iter().all(|c| c.ty == "string")
}

fn selector_token(value: &LogValue) -> Result<String> {
    match value {
        LogValue::Text(name) => Ok(name.clone()),
        LogValue::Bytes(bytes) if bytes.len() == 4 => Ok(format!("0x{}", hex::encode(bytes))),
        other => Err(Error::UnexpectedValue {
            field: "action selector",
            expected: "text or bytes4",
            found: other.kind().to_string(),
        }),
    }
}

fn instance_token(value: &LogValue) -> Result<String> {
    match value {
        LogValue::Text(name) => Ok(name.clone()),
        LogValue::Address(address) => Ok(address.to_string()),
        other => Err(Error::UnexpectedValue {
            field: "action contract",
            expected: "text or address",
            found: other.kind().to_string(),
        }),
    }
}
