//! Byzantine threshold acceptance rule.

/// Maximum tolerated Byzantine participants: f = ceil(N / 3).
pub fn byzantine_threshold(participants: usize) -> usize {
    participants.div_ceil(3)
}

/// Stateless acceptance test for an aggregated round-1 bundle.
///
/// Evaluated independently by every node; a rejection only biases that
/// node's own round-2 contribution toward an exception, it never halts
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    threshold: usize,
}

impl ThresholdPolicy {
    /// Create the policy for a tree of `participants` members.
    pub fn new(participants: usize) -> Self {
        Self {
            threshold: byzantine_threshold(participants),
        }
    }

    /// The threshold f this policy tolerates.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Apply the acceptance rule.
    ///
    /// Rejects when more than f participants refused outright, or when the
    /// independently verified signatures do not exceed 2f. The first failing
    /// condition determines the verdict.
    pub fn evaluate(&self, exception_count: usize, good_signature_count: usize) -> bool {
        if exception_count > self.threshold {
            return false;
        }
        if good_signature_count <= 2 * self.threshold {
            return false;
        }
        true
    }
}
