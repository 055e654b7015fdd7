//! Actions returned by the protocol state machine.

use crate::{OutboundMessage, RunResult};
use treesign_messages::SignatureRequest;
use treesign_types::{Block, ParticipantId};

/// Side effects for the runner to execute.
///
/// Verification actions exist so that fan-out never waits on verification:
/// the state machine emits the task and keeps handling messages; the runner
/// delivers the boolean later as an event.
#[derive(Debug, Clone)]
pub enum Action {
    /// Send a message to a specific tree neighbor.
    Send {
        /// The neighbor to deliver to.
        to: ParticipantId,
        /// The message to deliver.
        message: OutboundMessage,
    },

    /// Start the asynchronous block verification task.
    ///
    /// The runner must deliver exactly one
    /// [`Event::BlockVerified`](crate::Event::BlockVerified) in response.
    StartBlockVerification {
        /// The block to validate.
        block: Block,
    },

    /// Start the asynchronous signature-request verification task.
    ///
    /// The runner must deliver exactly one
    /// [`Event::BundleVerified`](crate::Event::BundleVerified) in response.
    StartBundleVerification {
        /// The block the request's signatures are checked against.
        block: Block,
        /// The request carrying the phase-1 bundle.
        request: SignatureRequest,
    },

    /// Deliver the final result to the run's caller. Root only, exactly once.
    EmitRunResult {
        /// The completed run result.
        result: RunResult,
    },
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Send { .. } => "Send",
            Action::StartBlockVerification { .. } => "StartBlockVerification",
            Action::StartBundleVerification { .. } => "StartBundleVerification",
            Action::EmitRunResult { .. } => "EmitRunResult",
        }
    }
}
