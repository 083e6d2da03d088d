//! ABI codec using alloy-dyn-abi

use alloy_dyn_abi::{DynSolValue, EventExt, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Event, Function};
use alloy_primitives::{Bytes, Selector, B256};
use anyhow::{Context, Result};

use crate::domain::ContractRegistry;
use crate::error::Error;

/// Encode calldata (selector included) for `function`
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> crate::Result<Bytes> {
    function
        .abi_encode_input(args)
        .map(Bytes::from)
        .map_err(|err| Error::Encode {
            function: function.signature(),
            reason: err.to_string(),
        })
}

/// Decode a function's return data
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>> {
    if function.outputs.is_empty() {
        return Ok(Vec::new());
    }
    function
        .abi_decode_output(data)
        .context("Failed to decode return data")
}

/// Decode an event into its arguments in declaration order
///
/// Indexed and body values are interleaved back into the order the event
/// declares them.
pub fn decode_event(event: &Event, topics: &[B256], data: &[u8]) -> Result<Vec<DynSolValue>> {
    let decoded = event
        .decode_log_parts(topics.iter().copied(), data)
        .with_context(|| format!("Failed to decode {}", event.signature()))?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    event
        .inputs
        .iter()
        .enumerate()
        .map(|(idx, param)| {
            let value = if param.indexed {
                indexed.next()
            } else {
                body.next()
            };
            value.with_context(|| format!("missing value for argument {idx} of {}", event.name))
        })
        .collect()
}

/// Turn revert data into a readable reason
///
/// Custom errors known to the registry are tried first, then the standard
/// `Error(string)` and `Panic(uint256)` payloads.
pub fn decode_revert(registry: &ContractRegistry, data: &[u8]) -> String {
    if data.is_empty() {
        return "execution reverted without data".to_string();
    }
    if data.len() >= 4 {
        let selector = Selector::from_slice(&data[..4]);
        if let Some((contract, error)) = registry.error(selector) {
            if let Ok(values) = error.abi_decode_input(&data[4..]) {
                let args: Vec<String> = values.iter().map(format_value).collect();
                return format!("{}::{}({})", contract.name, error.name, args.join(", "));
            }
        }
    }
    alloy_sol_types::decode_revert_reason(data)
        .unwrap_or_else(|| format!("0x{}", hex::encode(data)))
}

/// Format a DynSolValue for display
pub fn format_value(value: &DynSolValue) -> String {
    #[allow(unreachable_patterns)]
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => {
            let s = u.to_string();
            // For very large numbers, show hex instead
            if s.len() > 20 {
                format!("0x{:x}", u)
            } else {
                s
            }
        }
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_string(),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr.iter().take(max_items).map(format_value).collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
        other => format!("{other:?}"),
    }
}
