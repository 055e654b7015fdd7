//! Ntree two-round tree-signing state machine.
//!
//! Each participant of the signing tree runs one [`NtreeState`]. The
//! protocol is two broadcast-then-aggregate rounds over the tree:
//!
//! - `Event::Start` → root announces the block and starts verifying it
//! - `Event::AnnounceReceived` → relay to children, start block verification
//! - `Event::PhaseOneBundleReceived` → merge child bundles; once complete,
//!   contribute own signature or exception and forward up (root: broadcast
//!   the signature request instead)
//! - `Event::SignatureRequestReceived` → relay to children, start bundle
//!   verification against the Byzantine threshold
//! - `Event::PhaseTwoBundleReceived` → merge; once complete, contribute and
//!   forward up (root: emit the final result)
//!
//! All I/O is performed by the runner via returned `Action`s. Verification
//! runs outside the machine and reports back through `BlockVerified` /
//! `BundleVerified` events, so message fan-out never waits on it.

mod state;
mod threshold;
mod verify;

pub use state::{NtreeState, Phase};
pub use threshold::{byzantine_threshold, ThresholdPolicy};
pub use verify::verify_signature_request;
