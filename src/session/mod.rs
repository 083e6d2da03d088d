//! Session layer: the client that owns execution state, the navigator and
//! the driver loop tying them to the terminal

mod client;
mod driver;
mod navigator;

pub use client::{Client, QueryResult};
pub use driver::{Driver, DriverOptions};
pub use navigator::{navigate, PROMPT_MESSAGE};
