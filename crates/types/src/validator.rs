//! Block validation hook.

use crate::Block;

/// Application hook deciding whether a proposed block is acceptable.
///
/// Invoked once per participant per run. A `false` verdict does not abort
/// the protocol; it turns that participant's round-1 contribution into an
/// exception.
pub trait BlockValidator: Send + Sync {
    /// Check structural/application validity of a block.
    fn is_valid(&self, block: &Block) -> bool;
}

/// Validator that accepts every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl BlockValidator for AcceptAll {
    fn is_valid(&self, _block: &Block) -> bool {
        true
    }
}

/// Validator with a fixed verdict, for driving refusal scenarios in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedVerdict(pub bool);

impl BlockValidator for FixedVerdict {
    fn is_valid(&self, _block: &Block) -> bool {
        self.0
    }
}
