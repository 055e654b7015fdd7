//! Core traits for state machines.

use crate::{Action, Event};

/// A state machine that processes events.
///
/// All protocol logic is implemented as state machines that are:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state + event = same actions
/// - **Pure-ish**: Mutates self, but performs no I/O
pub trait StateMachine {
    /// Process an event, returning actions to perform.
    ///
    /// # Guarantees
    ///
    /// - **Synchronous**: This method never blocks or awaits
    /// - **Deterministic**: Given the same state and event, always returns the same actions
    /// - **No I/O**: All I/O is performed by the runner via the returned actions
    fn handle(&mut self, event: Event) -> Vec<Action>;
}
