//! One-shot inclusion-proof verification and leaf invalidation (spec.md
//! §4.7): tracks which leaves of a given Merkle root have already been
//! consumed.

use crate::crypto::CryptoProvider;
use crate::error::SwapError;
use crate::events::{Event, EventSink};
use std::collections::{HashMap, HashSet};

/// spec.md §3 `MerkleInvalidator`: `invalidated: map<root, map<leaf_index,
/// bool>>`. Entries are created on first insertion and never removed.
#[derive(Debug, Default)]
pub struct MerkleInvalidator {
    invalidated: HashMap<[u8; 32], HashSet<u64>>,
}

impl MerkleInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// spec.md §4.7: walks `proof` right-to-root, sorting each pair
    /// lexicographically before hashing (`Keccak-256(min(a,b) || max(a,b))`)
    /// so proofs verify independent of left/right orientation. Implementers
    /// must not switch to positional hashing (spec.md §9 open question) —
    /// proofs produced by a sorted-pair tree would stop verifying.
    pub fn verify_inclusion(
        &self,
        proof: &[[u8; 32]],
        root: [u8; 32],
        mut index: u64,
        leaf: [u8; 32],
        crypto: &dyn CryptoProvider,
    ) -> bool {
        let mut current = leaf;
        for sibling in proof {
            let (a, b) = if current <= *sibling {
                (current, *sibling)
            } else {
                (*sibling, current)
            };
            let mut buf = Vec::with_capacity(64);
            buf.extend_from_slice(&a);
            buf.extend_from_slice(&b);
            current = crypto.keccak256(&buf);
            index /= 2;
        }
        current == root
    }

    /// spec.md §4.7 `invalidate`: verifies the proof, rejects replay with
    /// `AlreadyInvalidated`, then records and emits `NodeInvalidated`.
    pub fn invalidate(
        &mut self,
        root: [u8; 32],
        proof: &[[u8; 32]],
        index: u64,
        leaf: [u8; 32],
        crypto: &dyn CryptoProvider,
        events: &mut dyn EventSink,
    ) -> Result<(), SwapError> {
        let span = tracing::info_span!("merkle.invalidate", root = %hex::encode(root), index);
        let _enter = span.enter();
        if !self.verify_inclusion(proof, root, index, leaf, crypto) {
            tracing::warn!("invalidate rejected: InvalidProof");
            return Err(SwapError::InvalidProof);
        }
        if self.is_invalidated(root, index) {
            tracing::warn!("invalidate rejected: AlreadyInvalidated");
            return Err(SwapError::AlreadyInvalidated);
        }

        self.invalidated.entry(root).or_default().insert(index);
        events.emit(Event::NodeInvalidated {
            merkle_root: root,
            index,
            leaf_hash: leaf,
        });
        Ok(())
    }

    pub fn is_invalidated(&self, root: [u8; 32], index: u64) -> bool {
        self.invalidated.get(&root).is_some_and(|leaves| leaves.contains(&index))
    }
}
