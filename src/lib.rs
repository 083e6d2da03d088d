//! menucall: walk the menu system a contract emits as event logs
//!
//! A contract describes menus by emitting `Menu_*` and `Target_*` events
//! during a read-only call. This crate rebuilds those events into a graph,
//! renders it in the terminal, and dispatches the chosen target's action as
//! the next call.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod session;
pub mod ui;

pub use error::{Error, Result};
