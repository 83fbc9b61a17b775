//! Incremental binary Merkle tree over SHA-256 leaves (component F).
//!
//! On an odd-sized level the last node is duplicated (`H(x || x)`)
//! rather than carried up unchanged — spec.md §4.F is explicit that this
//! must hold consistently on both `add` and `get_proof`, which is
//! stricter than `original_source/backend/src/merkle_log.py`'s
//! `get_proof` (which silently drops the sibling step on an odd level;
//! see Design Notes in DESIGN.md).

use serde::{Deserialize, Serialize};
use sha2::Digest;

/// 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

fn leaf_hash(data: &[u8]) -> Hash {
    sha2::Sha256::digest(data).into()
}

fn parent_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = sha2::Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Which side of the current hash the sibling sits on, for proof replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// sibling is to the left of the current hash
    Left,
    /// sibling is to the right of the current hash
    Right,
}

/// One step of an inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// sibling hash, hex-encoded
    pub hash: String,
    /// which side the sibling is on
    pub direction: Direction,
}

/// An inclusion proof for one leaf: the sequence of sibling hashes from
/// leaf level up to (but not including) the root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(pub Vec<ProofStep>);

/// Incremental Merkle tree. `add_leaf` appends and rebuilds all levels;
/// callers MUST NOT request the root before the first insertion.
#[derive(Default)]
pub struct MerkleTree {
    leaves: Vec<Hash>,
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// A fresh, empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf (the canonical serialization of a ballot) and
    /// return its `(index, hex leaf hash)`.
    pub fn add_leaf(&mut self, data: &[u8]) -> (usize, String) {
        let hash = leaf_hash(data);
        self.leaves.push(hash);
        self.rebuild();
        (self.leaves.len() - 1, hex::encode(hash))
    }

    fn rebuild(&mut self) {
        if self.leaves.is_empty() {
            self.levels.clear();
            return;
        }
        let mut current = self.leaves.clone();
        let mut levels = vec![current.clone()];
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                next.push(parent_hash(left, right));
            }
            levels.push(next.clone());
            current = next;
        }
        self.levels = levels;
    }

    /// Number of leaves inserted so far.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// `true` if no leaves have been inserted.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Root hash, hex-encoded. `None` before the first insertion.
    pub fn root(&self) -> Option<String> {
        self.levels.last().map(|top| hex::encode(top[0]))
    }

    /// Inclusion proof for leaf `index`. `None` if out of range.
    pub fn proof(&self, index: usize) -> Option<Proof> {
        if index >= self.leaves.len() {
            return None;
        }
        let mut steps = Vec::new();
        let mut current_index = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let is_right_node = current_index % 2 == 1;
            let sibling_index = if is_right_node {
                current_index - 1
            } else {
                current_index + 1
            };
            let sibling = level.get(sibling_index).unwrap_or(&level[current_index]);
            steps.push(ProofStep {
                hash: hex::encode(sibling),
                direction: if is_right_node {
                    Direction::Left
                } else {
                    Direction::Right
                },
            });
            current_index /= 2;
        }
        Some(Proof(steps))
    }
}

/// Verify that `leaf_bytes` is included under `root`, given `proof`.
/// Stateless: does not require a [`MerkleTree`] instance.
pub fn verify_proof(leaf_bytes: &[u8], proof: &Proof, root: &str) -> bool {
    let mut current = leaf_hash(leaf_bytes);
    for step in &proof.0 {
        let Ok(sibling_bytes) = hex::decode(&step.hash) else {
            return false;
        };
        let Ok(sibling): Result<Hash, _> = sibling_bytes.try_into() else {
            return false;
        };
        current = match step.direction {
            Direction::Right => parent_hash(&current, &sibling),
            Direction::Left => parent_hash(&sibling, &current),
        };
    }
    hex::encode(current) == root
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_is_none_before_first_insert() {
        let tree = MerkleTree::new();
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn single_leaf_proof_verifies() {
        let mut tree = MerkleTree::new();
        tree.add_leaf(b"vote a");
        let root = tree.root().unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(verify_proof(b"vote a", &proof, &root));
    }

    #[test]
    fn odd_sized_level_duplicates_consistently() {
        let mut tree = MerkleTree::new();
        for data in [&b"a"[..], b"b", b"c"] {
            tree.add_leaf(data);
        }
        let root = tree.root().unwrap();
        for (i, data) in [&b"a"[..], b"b", b"c"].into_iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert!(verify_proof(data, &proof, &root), "leaf {i} failed to verify");
        }
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let mut tree = MerkleTree::new();
        tree.add_leaf(b"vote a");
        tree.add_leaf(b"vote b");
        let root = tree.root().unwrap();
        let proof = tree.proof(1).unwrap();
        assert!(!verify_proof(b"vote tampered", &proof, &root));
    }

    #[test]
    fn deterministic_replay_yields_identical_roots() {
        let entries: Vec<&[u8]> = vec![b"1", b"2", b"3", b"4", b"5", b"6", b"7"];
        let mut original = MerkleTree::new();
        let mut roots_a = Vec::new();
        for e in &entries {
            original.add_leaf(e);
            roots_a.push(original.root().unwrap());
        }
        let mut replay = MerkleTree::new();
        let mut roots_b = Vec::new();
        for e in &entries {
            replay.add_leaf(e);
            roots_b.push(replay.root().unwrap());
        }
        assert_eq!(roots_a, roots_b);
    }

    #[test]
    fn out_of_range_proof_is_none() {
        let mut tree = MerkleTree::new();
        tree.add_leaf(b"only one");
        assert!(tree.proof(1).is_none());
    }
}
