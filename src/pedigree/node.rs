//! PedigreeNode — one companion in an ancestry tree
//!
//! Nodes are immutable once created and shared through `Arc`, so two
//! lineages may converge on the same ancestor. Every node carries a
//! lineage hash chaining its genome fingerprint onto its parents' hashes,
//! which lets a received tree be checked for tampering.

use super::PedigreeSnapshot;
use crate::genome::Genome;
use chrono::{DateTime, Utc};
use log::info;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct PedigreeNode {
    pub id: String,
    pub name: String,
    /// Owned copy; never aliases the caller's genome
    pub genome: Genome,
    pub parent1: Option<Arc<PedigreeNode>>,
    pub parent2: Option<Arc<PedigreeNode>>,
    /// 0 without parents, else one more than the older parent
    pub generation: u32,
    pub birth_date: DateTime<Utc>,
    pub lineage_hash: String,
}

impl PedigreeNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genome: &Genome,
        parent1: Option<Arc<PedigreeNode>>,
        parent2: Option<Arc<PedigreeNode>>,
    ) -> Arc<Self> {
        Self::born_at(id, name, genome, parent1, parent2, Utc::now())
    }

    pub fn born_at(
        id: impl Into<String>,
        name: impl Into<String>,
        genome: &Genome,
        parent1: Option<Arc<PedigreeNode>>,
        parent2: Option<Arc<PedigreeNode>>,
        birth_date: DateTime<Utc>,
    ) -> Arc<Self> {
        let generation = [&parent1, &parent2]
            .into_iter()
            .flatten()
            .map(|p| p.generation + 1)
            .max()
            .unwrap_or(0);
        let genome = genome.clone();
        let lineage_hash = Self::chain_hash(&genome, parent1.as_deref(), parent2.as_deref());
        let node = Self {
            id: id.into(),
            name: name.into(),
            genome,
            parent1,
            parent2,
            generation,
            birth_date,
            lineage_hash,
        };
        if generation > 0 {
            info!("Pedigree node '{}' ({}) at generation {}", node.name, node.id, generation);
        }
        Arc::new(node)
    }

    pub fn parents(&self) -> impl Iterator<Item = &Arc<PedigreeNode>> {
        self.parent1.iter().chain(self.parent2.iter())
    }

    pub fn is_founder(&self) -> bool {
        self.parent1.is_none() && self.parent2.is_none()
    }

    /// Every reachable ancestor in pre-order (parent1's line, then
    /// parent2's). Ancestors reached along several paths appear once per path.
    pub fn ancestors(&self) -> Vec<Arc<PedigreeNode>> {
        self.ancestors_within(usize::MAX)
    }

    /// Pre-order ancestors no more than `max_depth` generations up
    pub fn ancestors_within(&self, max_depth: usize) -> Vec<Arc<PedigreeNode>> {
        let mut out = Vec::new();
        let mut stack: Vec<(Arc<PedigreeNode>, usize)> = Vec::new();
        Self::push_parents(&mut stack, self, 1, max_depth);
        while let Some((node, depth)) = stack.pop() {
            Self::push_parents(&mut stack, &node, depth + 1, max_depth);
            out.push(node);
        }
        out
    }

    fn push_parents(stack: &mut Vec<(Arc<PedigreeNode>, usize)>, node: &PedigreeNode, depth: usize, max_depth: usize) {
        if depth > max_depth {
            return;
        }
        // parent2 first so parent1 pops first
        if let Some(p) = &node.parent2 {
            stack.push((Arc::clone(p), depth));
        }
        if let Some(p) = &node.parent1 {
            stack.push((Arc::clone(p), depth));
        }
    }

    /// Ancestors with duplicates removed by id, in pre-order of first
    /// occurrence. A seen ancestor's line is not walked again.
    pub fn unique_ancestors(&self) -> Vec<Arc<PedigreeNode>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack: Vec<Arc<PedigreeNode>> = Vec::new();
        Self::push_parents_unbounded(&mut stack, self);
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id.clone()) {
                continue;
            }
            Self::push_parents_unbounded(&mut stack, &node);
            out.push(node);
        }
        out
    }

    fn push_parents_unbounded(stack: &mut Vec<Arc<PedigreeNode>>, node: &PedigreeNode) {
        if let Some(p) = &node.parent2 {
            stack.push(Arc::clone(p));
        }
        if let Some(p) = &node.parent1 {
            stack.push(Arc::clone(p));
        }
    }

    /// Longest parent chain above this node; 0 for a founder.
    /// Each shared ancestor is measured once.
    pub fn depth(&self) -> usize {
        let mut memo: HashMap<*const PedigreeNode, usize> = HashMap::new();
        let mut stack: Vec<(&PedigreeNode, bool)> = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            let key: *const PedigreeNode = node;
            if memo.contains_key(&key) {
                continue;
            }
            if expanded {
                let depth = node
                    .parents()
                    .map(|p| memo.get(&Arc::as_ptr(p)).copied().unwrap_or(0) + 1)
                    .max()
                    .unwrap_or(0);
                memo.insert(key, depth);
            } else {
                stack.push((node, true));
                for parent in node.parents() {
                    if !memo.contains_key(&Arc::as_ptr(parent)) {
                        stack.push((parent.as_ref(), false));
                    }
                }
            }
        }
        let root: *const PedigreeNode = self;
        memo.get(&root).copied().unwrap_or(0)
    }

    /// Depth-bounded snapshot for storage and transport
    pub fn snapshot(&self, max_depth: usize) -> PedigreeSnapshot {
        PedigreeSnapshot::from_node(self, max_depth)
    }

    /// Recompute the lineage hash of this node and every ancestor
    pub fn verify_lineage(&self) -> bool {
        let own = Self::chain_hash(&self.genome, self.parent1.as_deref(), self.parent2.as_deref());
        own == self.lineage_hash
            && self.unique_ancestors().iter().all(|a| {
                Self::chain_hash(&a.genome, a.parent1.as_deref(), a.parent2.as_deref()) == a.lineage_hash
            })
    }

    fn chain_hash(genome: &Genome, parent1: Option<&PedigreeNode>, parent2: Option<&PedigreeNode>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(genome.fingerprint().as_bytes());
        for parent in [parent1, parent2] {
            match parent {
                Some(p) => hasher.update(p.lineage_hash.as_bytes()),
                None => hasher.update(b"founder"),
            }
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Base7Digit, Strand};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genome(seed: u64) -> Genome {
        Genome::random(&mut StdRng::seed_from_u64(seed))
    }

    fn founder(id: &str) -> Arc<PedigreeNode> {
        PedigreeNode::new(id, id.to_uppercase(), &genome(id.len() as u64), None, None)
    }

    /// child(gen 3) ← mid(gen 2) ← low(gen 1) ← founders
    fn three_deep() -> Arc<PedigreeNode> {
        let a = founder("a");
        let b = founder("b");
        let low = PedigreeNode::new("low", "Low", &genome(1), Some(a), Some(b));
        let c = founder("c");
        let mid = PedigreeNode::new("mid", "Mid", &genome(2), Some(low), Some(c));
        let d = founder("d");
        PedigreeNode::new("child", "Child", &genome(3), Some(mid), Some(d))
    }

    #[test]
    fn test_founder_generation_zero() {
        let f = founder("hana");
        assert_eq!(f.generation, 0);
        assert!(f.is_founder());
        assert_eq!(f.depth(), 0);
        assert!(f.ancestors().is_empty());
    }

    #[test]
    fn test_generation_from_older_parent() {
        let f = founder("f");
        let g1 = PedigreeNode::new("g1", "G1", &genome(1), Some(f.clone()), Some(f.clone()));
        let g2 = PedigreeNode::new("g2", "G2", &genome(2), Some(g1.clone()), Some(f.clone()));
        let g3 = PedigreeNode::new("g3", "G3", &genome(3), Some(g2.clone()), Some(g1.clone()));
        assert_eq!(g2.generation, 2);
        assert_eq!(g3.generation, 3);
        let child = PedigreeNode::new("x", "X", &genome(4), Some(g2), Some(g3));
        assert_eq!(child.generation, 4);
    }

    #[test]
    fn test_single_parent_generation() {
        let f = founder("f");
        let only = PedigreeNode::new("o", "O", &genome(5), None, Some(f));
        assert_eq!(only.generation, 1);
        assert_eq!(only.depth(), 1);
    }

    #[test]
    fn test_genome_is_copied() {
        let mut g = genome(9);
        let node = PedigreeNode::new("n", "N", &g, None, None);
        g.personality = Strand::uniform(Base7Digit::MIN);
        assert_ne!(node.genome, g);
    }

    #[test]
    fn test_depth_three_generations() {
        assert_eq!(three_deep().depth(), 3);
    }

    #[test]
    fn test_ancestors_preorder() {
        let child = three_deep();
        let ids: Vec<String> = child.ancestors().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["mid", "low", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_ancestors_within_depth() {
        let child = three_deep();
        let ids: Vec<String> = child.ancestors_within(1).iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["mid", "d"]);
        let ids: Vec<String> = child.ancestors_within(2).iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["mid", "low", "c", "d"]);
        assert!(child.ancestors_within(0).is_empty());
    }

    #[test]
    fn test_shared_ancestor_not_deduplicated() {
        let f = founder("f");
        let left = PedigreeNode::new("l", "L", &genome(1), Some(f.clone()), None);
        let right = PedigreeNode::new("r", "R", &genome(2), Some(f.clone()), None);
        let child = PedigreeNode::new("c", "C", &genome(3), Some(left), Some(right));
        let all = child.ancestors();
        assert_eq!(all.iter().filter(|a| a.id == "f").count(), 2);
        assert_eq!(all.len(), 4);
        let unique = child.unique_ancestors();
        assert_eq!(unique.len(), 3);
    }

    /// a_i and b_i are both children of a_{i-1} and b_{i-1}
    fn sibling_line(generations: usize) -> Arc<PedigreeNode> {
        let g = genome(20);
        let mut a = PedigreeNode::new("a0", "A0", &g, None, None);
        let mut b = PedigreeNode::new("b0", "B0", &g, None, None);
        for i in 1..=generations {
            let next_a = PedigreeNode::new(format!("a{}", i), "A", &g, Some(a.clone()), Some(b.clone()));
            let next_b = PedigreeNode::new(format!("b{}", i), "B", &g, Some(a), Some(b));
            a = next_a;
            b = next_b;
        }
        a
    }

    #[test]
    fn test_reconverging_line_depth() {
        let tip = sibling_line(64);
        assert_eq!(tip.generation, 64);
        assert_eq!(tip.depth(), 64);
        assert_eq!(tip.unique_ancestors().len(), 2 * 64);
        assert!(tip.verify_lineage());
        assert_eq!(tip.ancestors_within(2).len(), 6);
    }

    #[test]
    fn test_depth_matches_generation() {
        let child = three_deep();
        assert_eq!(child.depth(), child.generation as usize);
        let f = founder("f");
        let lopsided = PedigreeNode::new("x", "X", &genome(6), Some(child.clone()), Some(f));
        assert_eq!(lopsided.depth(), 4);
        assert_eq!(lopsided.generation, 4);
    }

    #[test]
    fn test_lineage_hash_verifies() {
        let child = three_deep();
        assert!(child.verify_lineage());
        assert_eq!(child.lineage_hash.len(), 64);

        let mut tampered = (*child).clone();
        tampered.genome.ability = Strand::uniform(Base7Digit::MAX);
        assert!(!tampered.verify_lineage());
    }

    #[test]
    fn test_lineage_hash_depends_on_parents() {
        let g = genome(10);
        let alone = PedigreeNode::new("x", "X", &g, None, None);
        let with_parent = PedigreeNode::new("x", "X", &g, Some(founder("p")), None);
        assert_ne!(alone.lineage_hash, with_parent.lineage_hash);
    }
}
