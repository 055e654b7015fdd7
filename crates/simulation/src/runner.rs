//! Event loop driving a set of in-process participants.

use crate::event_queue::{EventKey, EventQueue};
use crate::network::{NetworkConfig, SimulatedNetwork};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};
use treesign_core::{Action, CompletionSink, Event, OutboundMessage, RunResult, StateMachine};
use treesign_ntree::{verify_signature_request, NtreeState};
use treesign_types::{BlockValidator, ParticipantId, TreeTopology};

/// Default cap on processed events before the run is declared runaway.
const DEFAULT_STEP_LIMIT: u64 = 100_000;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// The queue drained without the root emitting a result.
    #[error("simulation stalled after {events_processed} events with no run result")]
    Stalled { events_processed: u64 },

    /// The run processed more events than the configured cap.
    #[error("exceeded step limit of {limit} events")]
    StepLimitExceeded { limit: u64 },
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub events_processed: u64,
    pub messages_sent: u64,
    pub verifications_run: u64,
    /// Simulated clock at the last processed event.
    pub sim_time_ms: u64,
}

struct SimNode {
    state: NtreeState,
    topology: Arc<dyn TreeTopology>,
    validator: Arc<dyn BlockValidator>,
}

/// Deterministic single-threaded runner.
///
/// Owns one [`NtreeState`] per participant plus the shared event queue.
/// Executes every returned [`Action`] inline: sends reappear as delivery
/// events after a sampled latency, verification tasks reappear as verdict
/// events, and the root's result is captured (and forwarded to the sink,
/// if any).
pub struct SimulationRunner {
    nodes: BTreeMap<ParticipantId, SimNode>,
    queue: EventQueue,
    network: SimulatedNetwork,
    sink: Option<Box<dyn CompletionSink>>,
    result: Option<RunResult>,
    stats: SimulationStats,
    now_ms: u64,
    step_limit: u64,
}

impl SimulationRunner {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            queue: EventQueue::new(),
            network: SimulatedNetwork::new(config),
            sink: None,
            result: None,
            stats: SimulationStats::default(),
            now_ms: 0,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Register a participant. The id comes from the topology view.
    pub fn add_node(
        &mut self,
        state: NtreeState,
        topology: Arc<dyn TreeTopology>,
        validator: Arc<dyn BlockValidator>,
    ) {
        let id = topology.local_id();
        let node = SimNode {
            state,
            topology,
            validator,
        };
        if self.nodes.insert(id, node).is_some() {
            warn!(participant = %id, "Replaced existing simulation node");
        }
    }

    /// Install a sink to receive the root's final result.
    pub fn set_completion_sink(&mut self, sink: Box<dyn CompletionSink>) {
        self.sink = Some(sink);
    }

    /// Cap the number of events processed by [`run_to_completion`].
    ///
    /// [`run_to_completion`]: Self::run_to_completion
    pub fn set_step_limit(&mut self, limit: u64) {
        self.step_limit = limit;
    }

    /// Schedule the start event at every root participant (one, normally).
    pub fn start(&mut self) {
        let roots: Vec<ParticipantId> = self
            .nodes
            .values()
            .filter(|node| node.topology.is_root())
            .map(|node| node.topology.local_id())
            .collect();
        if roots.is_empty() {
            warn!("No root participant registered");
        }
        for root in roots {
            self.queue.schedule(0, root, Event::Start);
        }
    }

    /// Drain the queue, returning the root's result.
    pub fn run_to_completion(&mut self) -> Result<RunResult, SimulationError> {
        while let Some((key, event)) = self.queue.pop_next() {
            if self.stats.events_processed >= self.step_limit {
                return Err(SimulationError::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }
            self.process_event(key, event);
        }
        match self.result.clone() {
            Some(result) => Ok(result),
            None => Err(SimulationError::Stalled {
                events_processed: self.stats.events_processed,
            }),
        }
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// The root's result, if one has been emitted.
    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    fn process_event(&mut self, key: EventKey, event: Event) {
        self.now_ms = key.time_ms;
        self.stats.events_processed += 1;
        self.stats.sim_time_ms = self.now_ms;

        let Some(node) = self.nodes.get_mut(&key.participant) else {
            warn!(participant = %key.participant, "Event for unknown participant");
            return;
        };

        trace!(
            participant = %key.participant,
            time_ms = key.time_ms,
            event = event.type_name(),
            "Processing event"
        );

        let actions = node.state.handle(event);
        for action in actions {
            self.execute_action(key.participant, action);
        }
    }

    fn execute_action(&mut self, origin: ParticipantId, action: Action) {
        match action {
            Action::Send { to, message } => {
                self.stats.messages_sent += 1;
                if !self.nodes.contains_key(&to) {
                    warn!(from = %origin, to = %to, "Dropping message to unknown participant");
                    return;
                }
                let delay = self.network.message_delay();
                trace!(
                    from = %origin,
                    to = %to,
                    message = message.type_name(),
                    delay_ms = delay,
                    "Delivering message"
                );
                self.queue
                    .schedule(self.now_ms + delay, to, delivery_event(origin, message));
            }

            Action::StartBlockVerification { block } => {
                self.stats.verifications_run += 1;
                let valid = self.nodes[&origin].validator.is_valid(&block);
                let delay = self.network.verification_delay();
                self.queue.schedule(
                    self.now_ms + delay,
                    origin,
                    Event::BlockVerified { valid },
                );
            }

            Action::StartBundleVerification { block, request } => {
                self.stats.verifications_run += 1;
                let valid = verify_signature_request(
                    &request,
                    &block,
                    self.nodes[&origin].topology.as_ref(),
                );
                let delay = self.network.verification_delay();
                self.queue.schedule(
                    self.now_ms + delay,
                    origin,
                    Event::BundleVerified { valid },
                );
            }

            Action::EmitRunResult { result } => {
                if self.result.is_some() {
                    warn!(participant = %origin, "Duplicate run result");
                    return;
                }
                debug!(
                    participant = %origin,
                    signatures = result.final_bundle.signatures.len(),
                    exceptions = result.final_bundle.exceptions.len(),
                    time_ms = self.now_ms,
                    "Run result emitted"
                );
                if let Some(sink) = &self.sink {
                    sink.on_run_complete(result.clone());
                }
                self.result = Some(result);
            }
        }
    }
}

/// Map a wire message onto the receiving participant's input event.
fn delivery_event(from: ParticipantId, message: OutboundMessage) -> Event {
    match message {
        OutboundMessage::Announce(announce) => Event::AnnounceReceived { from, announce },
        OutboundMessage::PhaseOneBundle(bundle) => Event::PhaseOneBundleReceived { from, bundle },
        OutboundMessage::SignatureRequest(request) => {
            Event::SignatureRequestReceived { from, request }
        }
        OutboundMessage::PhaseTwoBundle(bundle) => Event::PhaseTwoBundleReceived { from, bundle },
    }
}
