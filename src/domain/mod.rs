//! Domain layer: catalog records and the views built from them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod ancestry;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod forest;
pub mod grouping;
mod hierarchy;
pub mod node;

pub use ancestry::{ancestors, creates_cycle, descendants};
pub use entities::*;
pub use error::DomainError;
pub use flatten::{build_flattened, FlatEntry, FlattenedTree};
pub use forest::{build_forest, Forest, ForestNode};
pub use grouping::{build_groups, Group, GroupedView};
pub use node::{Node, NodeId, NO_PARENT};
