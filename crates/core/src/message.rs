//! Outbound message types for tree communication.

use treesign_messages::{BlockAnnounce, PhaseOneBundle, PhaseTwoBundle, SignatureRequest};

/// Outbound messages a participant can send to a tree neighbor.
///
/// The runner handles the actual delivery.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    /// Block announcement, sent to children.
    Announce(BlockAnnounce),

    /// Phase-1 bundle, sent to the parent.
    PhaseOneBundle(PhaseOneBundle),

    /// Signature request, sent to children.
    SignatureRequest(SignatureRequest),

    /// Phase-2 bundle, sent to the parent.
    PhaseTwoBundle(PhaseTwoBundle),
}

impl OutboundMessage {
    /// Get a human-readable name for this message type.
    pub fn type_name(&self) -> &'static str {
        match self {
            OutboundMessage::Announce(_) => "Announce",
            OutboundMessage::PhaseOneBundle(_) => "PhaseOneBundle",
            OutboundMessage::SignatureRequest(_) => "SignatureRequest",
            OutboundMessage::PhaseTwoBundle(_) => "PhaseTwoBundle",
        }
    }

    /// Check if this message travels down the tree (root towards leaves).
    pub fn is_broadcast(&self) -> bool {
        matches!(
            self,
            OutboundMessage::Announce(_) | OutboundMessage::SignatureRequest(_)
        )
    }
}
