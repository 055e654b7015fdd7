//! Phase-2 bundle aggregation message.

use serde::{Deserialize, Serialize};
use treesign_types::SignatureBundle;

/// Signature responses and exceptions travelling up the tree in round 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTwoBundle {
    /// Aggregated contributions of the sender's subtree.
    pub bundle: SignatureBundle,
}

impl PhaseTwoBundle {
    /// Create a new phase-2 bundle message.
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
