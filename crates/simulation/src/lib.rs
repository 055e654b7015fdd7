//! Deterministic simulation runner.
//!
//! This crate provides a fully deterministic in-process environment for
//! exercising the signing protocol. Given the same seed, it produces
//! identical results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, ..>)           │ │
//! │  │     Ordered by: time, participant, sequence        │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     nodes: one NtreeState per participant          │ │
//! │  │     Each processes events sequentially             │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → schedule new events                  │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Sends become deliveries after a sampled network latency; verification
//! actions become verdict events after a sampled verification latency. All
//! randomness flows from one seeded ChaCha generator.

mod event_queue;
mod network;
mod runner;

pub use event_queue::EventKey;
pub use network::{NetworkConfig, SimulatedNetwork};
pub use runner::{SimulationError, SimulationRunner, SimulationStats};
