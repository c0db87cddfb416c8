//! cattree: grouped and flattened views over self-referencing catalog records
//!
//! Layers, innermost first:
//! - [`domain`]: records, tree builders, catalog rules (no I/O)
//! - [`application`]: catalog service and subscription selection
//! - [`infrastructure`]: backend traits, JSON file store, wiring
//! - [`cli`]: argument parsing, rendering, command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{build_flattened, build_groups, Node, NodeId};
