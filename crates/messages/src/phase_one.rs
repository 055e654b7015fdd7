//! Phase-1 bundle aggregation message.

use serde::{Deserialize, Serialize};
use treesign_types::SignatureBundle;

/// Block signatures and exceptions travelling up the tree in round 1.
///
/// Each node sends exactly one of these to its parent, carrying its whole
/// subtree's contributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseOneBundle {
    /// Aggregated contributions of the sender's subtree.
    pub bundle: SignatureBundle,
}

impl PhaseOneBundle {
    /// Create a new phase-1 bundle message.
    pub fn new(bundle: SignatureBundle) -> Self {
        Self { bundle }
    }

    /// Get the inner bundle.
    pub fn bundle(&self) -> &SignatureBundle {
        &self.bundle
    }

    /// Consume and return the inner bundle.
    pub fn into_bundle(self) -> SignatureBundle {
        self.bundle
    }
}
