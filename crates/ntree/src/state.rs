//! Per-participant protocol state machine.

use indexmap::IndexSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use treesign_core::{Action, Event, OutboundMessage, RunResult, StateMachine};
use treesign_messages::{BlockAnnounce, PhaseOneBundle, PhaseTwoBundle, SignatureRequest};
use treesign_types::{
    block_signing_payload, header_signing_payload, Block, Exception, KeyPair, ParticipantId,
    SignatureBundle, TreeTopology,
};

/// Phase of the per-participant state machine.
///
/// A leaf's "awaiting children" condition is vacuously satisfied, so leaves
/// move through the awaiting phases as soon as their own verification
/// verdict arrives. Phase-2 contribution and forwarding happen atomically in
/// one event, so there is no observable state between
/// `AwaitingChildrenPhase2` and `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No announce processed yet.
    Idle,

    /// Block known; collecting phase-1 bundles from children.
    AwaitingChildrenPhase1,

    /// Own phase-1 contribution made and forwarded; waiting for the
    /// signature request from the parent.
    ComputedPhase1,

    /// Signature request relayed; collecting phase-2 bundles from children.
    AwaitingChildrenPhase2,

    /// Run finished at this participant.
    Done,
}

/// Aggregation state for one round.
struct RoundState {
    bundle: SignatureBundle,
    /// Which children have reported, not a bare counter, so duplicate
    /// delivery from a misbehaving overlay cannot corrupt the count.
    reported: IndexSet<ParticipantId>,
    contributed: bool,
}

impl RoundState {
    fn new() -> Self {
        Self {
            bundle: SignatureBundle::new(),
            reported: IndexSet::new(),
            contributed: false,
        }
    }
}

/// State machine for one participant of the signing tree.
///
/// Owns the participant's view of both rounds: the announced block, the
/// verification verdicts, and one accumulating bundle per phase. All
/// cross-participant effects go through returned [`Action`]s; no state is
/// shared between participants.
pub struct NtreeState {
    topology: Arc<dyn TreeTopology>,
    signing_key: KeyPair,
    phase: Phase,
    /// The block to sign. Set at construction for the root, on announce
    /// everywhere else.
    block: Option<Block>,
    /// Result of the block verification task, once delivered.
    block_verdict: Option<bool>,
    /// Result of the signature-request verification task, once delivered.
    request_verdict: Option<bool>,
    phase1: RoundState,
    phase2: RoundState,
}

impl NtreeState {
    /// Create the state machine for a non-root participant.
    pub fn new(topology: Arc<dyn TreeTopology>, signing_key: KeyPair) -> Self {
        Self {
            topology,
            signing_key,
            phase: Phase::Idle,
            block: None,
            block_verdict: None,
            request_verdict: None,
            phase1: RoundState::new(),
            phase2: RoundState::new(),
        }
    }

    /// Create the root's state machine with the block to sign this run.
    pub fn new_root(topology: Arc<dyn TreeTopology>, signing_key: KeyPair, block: Block) -> Self {
        let mut state = Self::new(topology, signing_key);
        state.block = Some(block);
        state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The block this participant is signing, if announced.
    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    /// Contributions accumulated for phase 1 so far.
    pub fn phase1_bundle(&self) -> &SignatureBundle {
        &self.phase1.bundle
    }

    /// Contributions accumulated for phase 2 so far.
    pub fn phase2_bundle(&self) -> &SignatureBundle {
        &self.phase2.bundle
    }

    fn local_id(&self) -> ParticipantId {
        self.topology.local_id()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════════

    fn on_start(&mut self) -> Vec<Action> {
        if !self.topology.is_root() {
            warn!(participant = %self.local_id(), "Start event at non-root");
            return vec![];
        }
        if self.phase != Phase::Idle {
            warn!(participant = %self.local_id(), phase = ?self.phase, "Start in wrong phase");
            return vec![];
        }
        let Some(block) = self.block.clone() else {
            warn!(participant = %self.local_id(), "Start without a block to announce");
            return vec![];
        };

        info!(
            participant = %self.local_id(),
            block = %block.hash(),
            participants = self.topology.participant_count(),
            "Starting Ntree run"
        );

        self.phase = Phase::AwaitingChildrenPhase1;

        let mut actions = vec![Action::StartBlockVerification {
            block: block.clone(),
        }];
        let announce = BlockAnnounce::new(block);
        for &child in self.topology.children() {
            actions.push(Action::Send {
                to: child,
                message: OutboundMessage::Announce(announce.clone()),
            });
        }
        actions
    }

    fn on_announce(&mut self, from: ParticipantId, announce: BlockAnnounce) -> Vec<Action> {
        if self.phase != Phase::Idle {
            warn!(
                participant = %self.local_id(),
                from = %from,
                phase = ?self.phase,
                "Ignoring announce in wrong phase"
            );
            return vec![];
        }
        if Some(from) != self.topology.parent() {
            warn!(participant = %self.local_id(), from = %from, "Announce from non-parent");
            return vec![];
        }

        debug!(participant = %self.local_id(), "Received block announcement");

        let block = announce.into_block();
        self.block = Some(block.clone());
        self.phase = Phase::AwaitingChildrenPhase1;

        // Fan out immediately; verification runs concurrently and reports
        // back through BlockVerified.
        let mut actions = vec![Action::StartBlockVerification {
            block: block.clone(),
        }];
        let announce = BlockAnnounce::new(block);
        for &child in self.topology.children() {
            actions.push(Action::Send {
                to: child,
                message: OutboundMessage::Announce(announce.clone()),
            });
        }
        actions.extend(self.try_contribute_phase1());
        actions
    }

    fn on_block_verified(&mut self, valid: bool) -> Vec<Action> {
        if self.block.is_none() {
            warn!(participant = %self.local_id(), "Block verdict before announce");
            return vec![];
        }
        if self.block_verdict.is_some() {
            warn!(participant = %self.local_id(), "Duplicate block verdict");
            return vec![];
        }
        self.block_verdict = Some(valid);
        debug!(participant = %self.local_id(), valid, "Block verification finished");
        self.try_contribute_phase1()
    }

    fn on_phase_one_bundle(&mut self, from: ParticipantId, bundle: PhaseOneBundle) -> Vec<Action> {
        if self.phase != Phase::AwaitingChildrenPhase1 {
            warn!(
                participant = %self.local_id(),
                from = %from,
                phase = ?self.phase,
                "Ignoring phase-1 bundle in wrong phase"
            );
            return vec![];
        }
        if !self.topology.is_child(from) {
            warn!(participant = %self.local_id(), from = %from, "Phase-1 bundle from non-child");
            return vec![];
        }
        if !self.phase1.reported.insert(from) {
            warn!(participant = %self.local_id(), from = %from, "Duplicate phase-1 bundle");
            return vec![];
        }

        self.phase1.bundle.merge(bundle.into_bundle());
        debug!(
            participant = %self.local_id(),
            from = %from,
            received = self.phase1.reported.len(),
            children = self.topology.child_count(),
            "Merged phase-1 bundle"
        );
        self.try_contribute_phase1()
    }

    fn on_signature_request(
        &mut self,
        from: ParticipantId,
        request: SignatureRequest,
    ) -> Vec<Action> {
        if self.phase != Phase::ComputedPhase1 {
            warn!(
                participant = %self.local_id(),
                from = %from,
                phase = ?self.phase,
                "Ignoring signature request in wrong phase"
            );
            return vec![];
        }
        if Some(from) != self.topology.parent() {
            warn!(participant = %self.local_id(), from = %from, "Signature request from non-parent");
            return vec![];
        }
        let Some(block) = self.block.clone() else {
            warn!(participant = %self.local_id(), "Signature request without a block");
            return vec![];
        };

        debug!(participant = %self.local_id(), "Received signature request");
        self.phase = Phase::AwaitingChildrenPhase2;

        let mut actions = vec![Action::StartBundleVerification {
            block,
            request: request.clone(),
        }];
        for &child in self.topology.children() {
            actions.push(Action::Send {
                to: child,
                message: OutboundMessage::SignatureRequest(request.clone()),
            });
        }
        actions.extend(self.try_contribute_phase2());
        actions
    }

    fn on_bundle_verified(&mut self, valid: bool) -> Vec<Action> {
        if self.request_verdict.is_some() {
            warn!(participant = %self.local_id(), "Duplicate bundle verdict");
            return vec![];
        }
        if self.phase != Phase::AwaitingChildrenPhase2 {
            warn!(
                participant = %self.local_id(),
                phase = ?self.phase,
                "Bundle verdict in wrong phase"
            );
            return vec![];
        }
        self.request_verdict = Some(valid);
        debug!(participant = %self.local_id(), valid, "Bundle verification finished");
        self.try_contribute_phase2()
    }

    fn on_phase_two_bundle(&mut self, from: ParticipantId, bundle: PhaseTwoBundle) -> Vec<Action> {
        if self.phase != Phase::AwaitingChildrenPhase2 {
            warn!(
                participant = %self.local_id(),
                from = %from,
                phase = ?self.phase,
                "Ignoring phase-2 bundle in wrong phase"
            );
            return vec![];
        }
        if !self.topology.is_child(from) {
            warn!(participant = %self.local_id(), from = %from, "Phase-2 bundle from non-child");
            return vec![];
        }
        if !self.phase2.reported.insert(from) {
            warn!(participant = %self.local_id(), from = %from, "Duplicate phase-2 bundle");
            return vec![];
        }

        self.phase2.bundle.merge(bundle.into_bundle());
        debug!(
            participant = %self.local_id(),
            from = %from,
            received = self.phase2.reported.len(),
            children = self.topology.child_count(),
            "Merged phase-2 bundle"
        );
        self.try_contribute_phase2()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Phase advancement
    // ═══════════════════════════════════════════════════════════════════════

    /// Contribute to phase 1 once every child has reported and the block
    /// verdict is in. Runs at most once per run; retriggered checks are
    /// no-ops.
    fn try_contribute_phase1(&mut self) -> Vec<Action> {
        if self.phase != Phase::AwaitingChildrenPhase1 || self.phase1.contributed {
            return vec![];
        }
        if self.phase1.reported.len() < self.topology.child_count() {
            return vec![];
        }
        let Some(valid) = self.block_verdict else {
            return vec![];
        };
        let Some(block) = self.block.clone() else {
            return vec![];
        };

        self.phase1.contributed = true;
        if valid {
            let signature = self.signing_key.sign(&block_signing_payload(&block));
            self.phase1.bundle.add_signature(signature);
        } else {
            self.phase1.bundle.add_exception(Exception::new(self.local_id()));
        }
        debug!(participant = %self.local_id(), signed = valid, "Computed phase-1 contribution");

        self.phase = Phase::ComputedPhase1;
        match self.topology.parent() {
            None => self.begin_signature_request(block),
            Some(parent) => vec![Action::Send {
                to: parent,
                message: OutboundMessage::PhaseOneBundle(PhaseOneBundle::new(
                    self.phase1.bundle.clone(),
                )),
            }],
        }
    }

    /// Root only: package the completed phase-1 bundle and broadcast it.
    fn begin_signature_request(&mut self, block: Block) -> Vec<Action> {
        info!(
            participant = %self.local_id(),
            signatures = self.phase1.bundle.signatures.len(),
            exceptions = self.phase1.bundle.exceptions.len(),
            "Phase 1 complete, broadcasting signature request"
        );

        let request = SignatureRequest::new(self.phase1.bundle.clone());
        self.phase = Phase::AwaitingChildrenPhase2;

        let mut actions = vec![Action::StartBundleVerification {
            block,
            request: request.clone(),
        }];
        for &child in self.topology.children() {
            actions.push(Action::Send {
                to: child,
                message: OutboundMessage::SignatureRequest(request.clone()),
            });
        }
        actions.extend(self.try_contribute_phase2());
        actions
    }

    /// Contribute to phase 2 once every child has reported and the bundle
    /// verdict is in, then forward up or finalize.
    fn try_contribute_phase2(&mut self) -> Vec<Action> {
        if self.phase != Phase::AwaitingChildrenPhase2 || self.phase2.contributed {
            return vec![];
        }
        if self.phase2.reported.len() < self.topology.child_count() {
            return vec![];
        }
        let Some(valid) = self.request_verdict else {
            return vec![];
        };
        let Some(block) = self.block.clone() else {
            return vec![];
        };

        self.phase2.contributed = true;
        if valid {
            let signature = self
                .signing_key
                .sign(&header_signing_payload(&block.header));
            self.phase2.bundle.add_signature(signature);
        } else {
            self.phase2.bundle.add_exception(Exception::new(self.local_id()));
        }
        debug!(participant = %self.local_id(), signed = valid, "Computed phase-2 contribution");

        self.phase = Phase::Done;
        match self.topology.parent() {
            None => {
                info!(
                    participant = %self.local_id(),
                    signatures = self.phase2.bundle.signatures.len(),
                    exceptions = self.phase2.bundle.exceptions.len(),
                    "Run complete"
                );
                vec![Action::EmitRunResult {
                    result: RunResult::new(block, self.phase2.bundle.clone()),
                }]
            }
            Some(parent) => vec![Action::Send {
                to: parent,
                message: OutboundMessage::PhaseTwoBundle(PhaseTwoBundle::new(
                    self.phase2.bundle.clone(),
                )),
            }],
        }
    }
}

impl StateMachine for NtreeState {
    fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::Start => self.on_start(),
            Event::AnnounceReceived { from, announce } => self.on_announce(from, announce),
            Event::PhaseOneBundleReceived { from, bundle } => {
                self.on_phase_one_bundle(from, bundle)
            }
            Event::SignatureRequestReceived { from, request } => {
                self.on_signature_request(from, request)
            }
            Event::PhaseTwoBundleReceived { from, bundle } => {
                self.on_phase_two_bundle(from, bundle)
            }
            Event::BlockVerified { valid } => self.on_block_verified(valid),
            Event::BundleVerified { valid } => self.on_bundle_verified(valid),
        }
    }
}
