//! BlockAnnounce broadcast message.

use serde::{Deserialize, Serialize};
use treesign_types::Block;

/// Announces the block to sign to the whole tree.
///
/// Relayed unmodified by every internal node to its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnnounce {
    /// The block being proposed for signing.
    pub block: Block,
}

impl BlockAnnounce {
    /// Create a new block announcement.
    pub fn new(block: Block) -> Self {
        Self { block }
    }

    /// Get the announced block.
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// Consume and return the announced block.
    pub fn into_block(self) -> Block {
        self.block
    }
}
