//! PedigreeSnapshot — the depth-bounded tree sent to storage
//!
//! Only identity fields travel: id, name, generation, birth date and the
//! parents. Parents beyond the depth cutoff are left out entirely.

use super::PedigreeNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of ancestor levels kept
pub const DEFAULT_SNAPSHOT_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedigreeSnapshot {
    pub id: String,
    pub name: String,
    pub generation: u32,
    pub birth_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent1: Option<Box<PedigreeSnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent2: Option<Box<PedigreeSnapshot>>,
}

impl PedigreeSnapshot {
    /// Recurses at most `max_depth` levels
    pub fn from_node(node: &PedigreeNode, max_depth: usize) -> Self {
        let parent = |p: &Option<std::sync::Arc<PedigreeNode>>| -> Option<Box<PedigreeSnapshot>> {
            if max_depth == 0 {
                return None;
            }
            p.as_deref().map(|n| Box::new(Self::from_node(n, max_depth - 1)))
        };
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            generation: node.generation,
            birth_date: node.birth_date,
            parent1: parent(&node.parent1),
            parent2: parent(&node.parent2),
        }
    }

    /// Levels of parents present in this snapshot
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((snap, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for p in [&snap.parent1, &snap.parent2].into_iter().flatten() {
                stack.push((p.as_ref(), depth + 1));
            }
        }
        deepest
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Depth-bounded JSON for `node`
pub fn serialize_pedigree(node: &PedigreeNode, max_depth: usize) -> serde_json::Result<String> {
    PedigreeSnapshot::from_node(node, max_depth).to_json()
}
