//! Pedigree — ancestry of companions linked by breeding
//!
//! Companions form a DAG: each node points at up to two parents and a
//! shared ancestor may be reachable along several paths. Traversals use
//! explicit work-lists, never unbounded recursion.

mod node;
mod snapshot;

pub use node::PedigreeNode;
pub use snapshot::{serialize_pedigree, PedigreeSnapshot, DEFAULT_SNAPSHOT_DEPTH};
