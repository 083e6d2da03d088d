//! Log records: decoded events normalised into typed tuples

use std::fmt;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, I256, U256};

use super::ContractInstance;

/// A decoded event argument
///
/// Event arguments arrive loosely typed from the ABI decoder; every consumer
/// checks the variant it needs at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogValue {
    Text(String),
    Bool(bool),
    Uint(U256),
    Int(I256),
    Address(Address),
    Bytes(Bytes),
    /// Tuples and arrays
    List(Vec<LogValue>),
}

impl LogValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[LogValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::Address(_) => "address",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Address(a) => write!(f, "{a}"),
            Self::Bytes(b) => write!(f, "{b}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&DynSolValue> for LogValue {
    fn from(value: &DynSolValue) -> Self {
        #[allow(unreachable_patterns)]
        match value {
            DynSolValue::Bool(b) => Self::Bool(*b),
            DynSolValue::Int(i, _) => Self::Int(*i),
            DynSolValue::Uint(u, _) => Self::Uint(*u),
            DynSolValue::FixedBytes(word, size) => {
                Self::Bytes(Bytes::copy_from_slice(&word.as_slice()[..(*size).min(32)]))
            }
            DynSolValue::Address(addr) => Self::Address(*addr),
            DynSolValue::Function(func) => Self::Bytes(Bytes::copy_from_slice(func.as_slice())),
            DynSolValue::Bytes(bytes) => Self::Bytes(Bytes::copy_from_slice(bytes)),
            DynSolValue::String(s) => Self::Text(s.clone()),
            DynSolValue::Array(items)
            | DynSolValue::FixedArray(items)
            | DynSolValue::Tuple(items) => Self::List(items.iter().map(Self::from).collect()),
            other => Self::Text(format!("{other:?}")),
        }
    }
}

/// The kind prefix of a record name (`Menu_*` or `Target_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Menu,
    Target,
}

/// The field suffix of a record name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Text,
    Id,
    Menu,
    Note,
    Button,
    Action,
    Target,
    Other(String),
}

impl Field {
    pub fn parse(name: &str) -> Self {
        match name {
            "Title" => Self::Title,
            "Text" => Self::Text,
            "Id" => Self::Id,
            "Menu" => Self::Menu,
            "Note" => Self::Note,
            "Button" => Self::Button,
            "Action" => Self::Action,
            "Target" => Self::Target,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "Title",
            Self::Text => "Text",
            Self::Id => "Id",
            Self::Menu => "Menu",
            Self::Note => "Note",
            Self::Button => "Button",
            Self::Action => "Action",
            Self::Target => "Target",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded event emitted during a query
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Contract instance that emitted the event
    pub origin: ContractInstance,
    /// Event name, e.g. `Menu_Title`
    pub name: String,
    /// Event arguments in declaration order
    pub args: Vec<LogValue>,
}

impl LogRecord {
    pub fn new(origin: ContractInstance, name: impl Into<String>, args: Vec<LogValue>) -> Self {
        Self {
            origin,
            name: name.into(),
            args,
        }
    }

    /// Split the record name into its kind and field.
    ///
    /// Returns `None` for names outside the `Menu_*`/`Target_*` vocabulary.
    pub fn kind(&self) -> Option<(RecordKind, Field)> {
        let (kind, field) = self.name.split_once('_')?;
        let kind = match kind {
            "Menu" => RecordKind::Menu,
            "Target" => RecordKind::Target,
            _ => return None,
        };
        Some((kind, Field::parse(field)))
    }
}
