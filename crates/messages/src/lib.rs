//! Wire messages exchanged over the signing tree.
//!
//! Four shapes, matching the two broadcast-then-aggregate rounds:
//!
//! - [`BlockAnnounce`] — the block, broadcast down (round 1).
//! - [`PhaseOneBundle`] — block signatures, aggregated up (round 1).
//! - [`SignatureRequest`] — the accepted phase-1 bundle, broadcast down (round 2).
//! - [`PhaseTwoBundle`] — signature responses, aggregated up (round 2).

mod announce;
mod phase_one;
mod phase_two;
mod signature_request;

pub use announce::BlockAnnounce;
pub use phase_one::PhaseOneBundle;
pub use phase_two::PhaseTwoBundle;
pub use signature_request::SignatureRequest;
