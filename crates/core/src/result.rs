//! Run completion types.

use treesign_types::{Block, SignatureBundle};

/// The aggregate signature the root hands back when a run completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// The block that was signed.
    pub block: Block,

    /// The final phase-2 bundle: one signature or exception per participant.
    pub final_bundle: SignatureBundle,
}

impl RunResult {
    /// Create a new run result.
    pub fn new(block: Block, final_bundle: SignatureBundle) -> Self {
        Self {
            block,
            final_bundle,
        }
    }
}

/// Collaborator invoked once by the runner with the root's final result.
///
/// Whether the run "succeeded" is the sink's judgment to make by inspecting
/// the final bundle's signature/exception counts; the protocol itself only
/// guarantees structural completion.
pub trait CompletionSink: Send + Sync {
    /// Receive the completed run result. Called exactly once per run.
    fn on_run_complete(&self, result: RunResult);
}

impl<F> CompletionSink for F
where
    F: Fn(RunResult) + Send + Sync,
{
    fn on_run_complete(&self, result: RunResult) {
        self(result)
    }
}
