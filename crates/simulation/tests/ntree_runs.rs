//! Full protocol runs over simulated trees.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_test::traced_test;
use treesign_core::RunResult;
use treesign_ntree::NtreeState;
use treesign_simulation::{NetworkConfig, SimulationError, SimulationRunner};
use treesign_test_helpers::{fixture_block, fixture_keypairs, fixture_roster, fixture_tree_views};
use treesign_types::{AcceptAll, BlockValidator, FixedVerdict, ParticipantId};

/// Build a runner over `n` participants in a binary tree, with the listed
/// participants refusing the block.
fn build_runner(n: u64, refusers: &[u64], seed: u64) -> SimulationRunner {
    let keys = fixture_keypairs(n);
    let roster = fixture_roster(&keys);
    let views = fixture_tree_views(&roster, 2);
    let block = fixture_block(3);

    let config = NetworkConfig {
        seed,
        ..Default::default()
    };
    let mut runner = SimulationRunner::new(config);

    for (i, view) in views.into_iter().enumerate() {
        let topology = view.into_arc();
        let validator: Arc<dyn BlockValidator> = if refusers.contains(&(i as u64)) {
            Arc::new(FixedVerdict(false))
        } else {
            Arc::new(AcceptAll)
        };
        let state = if i == 0 {
            NtreeState::new_root(topology.clone(), keys[i].clone(), block.clone())
        } else {
            NtreeState::new(topology.clone(), keys[i].clone())
        };
        runner.add_node(state, topology, validator);
    }

    runner.start();
    runner
}

#[traced_test]
#[test]
fn test_seven_nodes_all_honest() {
    let mut runner = build_runner(7, &[], 42);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    runner.set_completion_sink(Box::new(move |_result: RunResult| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let result = runner.run_to_completion().unwrap();

    assert_eq!(result.block, fixture_block(3));
    assert_eq!(result.final_bundle.signatures.len(), 7);
    assert!(result.final_bundle.exceptions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Each participant runs both verification tasks exactly once.
    assert_eq!(runner.stats().verifications_run, 14);
}

#[traced_test]
#[test]
fn test_nine_nodes_one_refusing_leaf() {
    // N = 9: f = 3, 2f = 6. Eight signatures clear the threshold, and the
    // refuser still signs the header in round 2 because the aggregate
    // verdict is independent of its own block verdict.
    let mut runner = build_runner(9, &[8], 42);
    let result = runner.run_to_completion().unwrap();

    assert_eq!(result.final_bundle.signatures.len(), 9);
    assert!(result.final_bundle.exceptions.is_empty());
}

#[traced_test]
#[test]
fn test_seven_nodes_two_refusing_leaves() {
    // N = 7: f = 3, 2f = 6. Five good signatures fall short, so every
    // participant's round-2 contribution degrades to an exception.
    let mut runner = build_runner(7, &[5, 6], 42);
    let result = runner.run_to_completion().unwrap();

    assert!(result.final_bundle.signatures.is_empty());
    assert_eq!(result.final_bundle.exceptions.len(), 7);
}

#[traced_test]
#[test]
fn test_refusing_internal_node_still_relays() {
    // N = 9 with participant 1 (an internal node) refusing: its subtree's
    // signatures still flow up through it, so eight signatures arrive at
    // the root and the run is accepted.
    let mut runner = build_runner(9, &[1], 42);
    let result = runner.run_to_completion().unwrap();

    assert_eq!(result.final_bundle.signatures.len(), 9);
    assert!(result.final_bundle.exceptions.is_empty());
}

#[traced_test]
#[test]
fn test_every_participant_contributes_exactly_once() {
    for n in [1u64, 2, 3, 7, 10, 15] {
        // Run once all-honest and once with the maximum tolerated number
        // of refusers at the tail of the roster.
        let f = treesign_ntree::byzantine_threshold(n as usize) as u64;
        let refusers: Vec<u64> = if n > 1 { (n - f.min(n - 1)..n).collect() } else { vec![] };

        for refusing in [&[][..], &refusers[..]] {
            let mut runner = build_runner(n, refusing, 42);
            let result = runner.run_to_completion().unwrap();
            let bundle = &result.final_bundle;
            assert_eq!(
                bundle.signatures.len() + bundle.exceptions.len(),
                n as usize,
                "wrong contribution count at n = {n}, refusers = {refusing:?}"
            );
        }
    }
}

#[traced_test]
#[test]
fn test_same_seed_is_deterministic() {
    let result_a = build_runner(7, &[6], 7777).run_to_completion().unwrap();
    let result_b = build_runner(7, &[6], 7777).run_to_completion().unwrap();
    assert_eq!(result_a, result_b);
}

#[traced_test]
#[test]
fn test_stalls_without_start() {
    let keys = fixture_keypairs(3);
    let roster = fixture_roster(&keys);
    let views = fixture_tree_views(&roster, 2);

    let mut runner = SimulationRunner::new(NetworkConfig::default());
    for (i, view) in views.into_iter().enumerate() {
        let topology = view.into_arc();
        let state = NtreeState::new(topology.clone(), keys[i].clone());
        runner.add_node(state, topology, Arc::new(AcceptAll));
    }

    // No start event was ever scheduled.
    let err = runner.run_to_completion().unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Stalled {
            events_processed: 0
        }
    ));
}

#[traced_test]
#[test]
fn test_step_limit_aborts_run() {
    let mut runner = build_runner(7, &[], 42);
    runner.set_step_limit(5);
    let err = runner.run_to_completion().unwrap_err();
    assert!(matches!(err, SimulationError::StepLimitExceeded { limit: 5 }));
}

#[traced_test]
#[test]
fn test_single_participant_never_clears_threshold() {
    // N = 1: f = 1, 2f = 2. The lone root signs round 1 but can never
    // exceed two signatures, so its own round-2 contribution is an
    // exception.
    let mut runner = build_runner(1, &[], 42);
    let result = runner.run_to_completion().unwrap();

    assert!(result.final_bundle.signatures.is_empty());
    assert_eq!(result.final_bundle.exceptions.len(), 1);
    assert_eq!(
        result.final_bundle.exceptions[0].participant,
        ParticipantId(0)
    );
}
