//! Domain model: log records, contracts, actions and the menu graph
//!
//! Nothing in here talks to a node or a terminal; the infrastructure layer
//! feeds decoded logs in and the session layer consumes the graph.

mod action;
mod contract;
mod log;
mod menu;
mod registry;

pub use action::{is_menu_response, Action, Resolver};
pub use contract::{ContractArtifact, ContractInstance, Deployments};
pub use log::{Field, LogRecord, LogValue, RecordKind};
pub use menu::{Menu, MenuGraph, MenuItem, Target};
pub use registry::{ContractRegistry, Indexed};
