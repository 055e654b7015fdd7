//! Events consumed by the protocol state machine.

use treesign_messages::{BlockAnnounce, PhaseOneBundle, PhaseTwoBundle, SignatureRequest};
use treesign_types::ParticipantId;

/// Inputs to a participant's state machine.
///
/// Network deliveries carry the sending neighbor; verification results are
/// delivered by the runner when a task started via
/// [`Action::StartBlockVerification`](crate::Action::StartBlockVerification)
/// or [`Action::StartBundleVerification`](crate::Action::StartBundleVerification)
/// finishes. Each verification task produces exactly one result event.
#[derive(Debug, Clone)]
pub enum Event {
    /// Start the run. Valid only at the root.
    Start,

    /// A block announcement arrived from the parent.
    AnnounceReceived {
        /// The neighbor that sent the announcement.
        from: ParticipantId,
        /// The announcement.
        announce: BlockAnnounce,
    },

    /// A phase-1 bundle arrived from a child.
    PhaseOneBundleReceived {
        /// The child that sent the bundle.
        from: ParticipantId,
        /// The child's aggregated subtree bundle.
        bundle: PhaseOneBundle,
    },

    /// A signature request arrived from the parent.
    SignatureRequestReceived {
        /// The neighbor that sent the request.
        from: ParticipantId,
        /// The request carrying the full phase-1 bundle.
        request: SignatureRequest,
    },

    /// A phase-2 bundle arrived from a child.
    PhaseTwoBundleReceived {
        /// The child that sent the bundle.
        from: ParticipantId,
        /// The child's aggregated subtree bundle.
        bundle: PhaseTwoBundle,
    },

    /// The local block verification task finished.
    BlockVerified {
        /// Whether the block passed validation.
        valid: bool,
    },

    /// The local signature-request verification task finished.
    BundleVerified {
        /// Whether the phase-1 bundle passed the threshold check.
        valid: bool,
    },
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Start => "Start",
            Event::AnnounceReceived { .. } => "AnnounceReceived",
            Event::PhaseOneBundleReceived { .. } => "PhaseOneBundleReceived",
            Event::SignatureRequestReceived { .. } => "SignatureRequestReceived",
            Event::PhaseTwoBundleReceived { .. } => "PhaseTwoBundleReceived",
            Event::BlockVerified { .. } => "BlockVerified",
            Event::BundleVerified { .. } => "BundleVerified",
        }
    }
}
