//! Core abstractions for the Ntree state machine: events in, actions out.
//!
//! The protocol state machine is synchronous and performs no I/O. The
//! runner feeds it [`Event`]s and executes the [`Action`]s it returns:
//! sending messages to tree neighbors, starting verification tasks, and
//! delivering the final run result.

mod action;
mod event;
mod message;
mod result;
mod traits;

pub use action::Action;
pub use event::Event;
pub use message::OutboundMessage;
pub use result::{CompletionSink, RunResult};
pub use traits::StateMachine;
