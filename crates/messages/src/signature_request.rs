//! Signature request broadcast message.

use serde::{Deserialize, Serialize};
use treesign_types::SignatureBundle;

/// The completed phase-1 bundle, broadcast down the tree by the root.
///
/// Every recipient verifies it independently and then decides whether its
/// own round-2 contribution is a signature or an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRequest {
    /// The full phase-1 bundle collected at the root.
    pub bundle: SignatureBundle,
}

impl SignatureRequest {
    /// Create a new signature request.
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
