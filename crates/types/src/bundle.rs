//! Signature bundle accumulated up the tree during each round.

use crate::{ParticipantId, Signature};
use serde::{Deserialize, Serialize};

/// Record that a participant declined to contribute a signature in a phase.
///
/// Carries no cryptographic content; a missing signature is represented
/// structurally, never by a placeholder signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exception {
    /// The participant that refused to sign.
    pub participant: ParticipantId,
}

impl Exception {
    /// Create an exception for a participant.
    pub fn new(participant: ParticipantId) -> Self {
        Self { participant }
    }
}

/// Accumulator of signatures and exceptions for one phase.
///
/// Invariant: exactly one contribution (signature or exception) per
/// participant per phase, so a bundle never holds more entries than the
/// participants in the subtree it aggregates. `merge` appends without
/// deduplication; callers merge at most once per child per phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBundle {
    /// Independent per-participant signatures.
    pub signatures: Vec<Signature>,

    /// Explicit refusals to sign.
    pub exceptions: Vec<Exception>,
}

impl SignatureBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another bundle's contributions to this one.
    ///
    /// Merge is associative and commutative in content: the order of merges
    /// affects only list order, which carries no semantics.
    pub fn merge(&mut self, other: SignatureBundle) {
        self.signatures.extend(other.signatures);
        self.exceptions.extend(other.exceptions);
    }

    /// Add a single signature contribution.
    pub fn add_signature(&mut self, signature: Signature) {
        self.signatures.push(signature);
    }

    /// Add a single exception contribution.
    pub fn add_exception(&mut self, exception: Exception) {
        self.exceptions.push(exception);
    }

    /// Total number of contributions (signatures + exceptions).
    pub fn len(&self) -> usize {
        self.signatures.len() + self.exceptions.len()
    }

    /// Check if the bundle holds no contributions.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty() && self.exceptions.is_empty()
    }
}
