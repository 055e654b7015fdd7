//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Participant identifier, stable for the lifetime of a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Participant({})", self.0)
    }
}

/// Block height.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Genesis block height.
    pub const GENESIS: Self = BlockHeight(0);

    /// Get the next block height.
    pub fn next(self) -> Self {
        BlockHeight(self.0 + 1)
    }

    /// Get the previous block height (returns None if at genesis).
    pub fn prev(self) -> Option<Self> {
        if self.0 > 0 {
            Some(BlockHeight(self.0 - 1))
        } else {
            None
        }
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}
