//! Signature-request verification.

use crate::ThresholdPolicy;
use tracing::debug;
use treesign_messages::SignatureRequest;
use treesign_types::{block_signing_payload, Block, Signature, TreeTopology};

/// Verify a signature request against the Byzantine threshold.
///
/// Counts the bundle signatures that verify against the round-1 block
/// payload under some roster key (wire signatures carry no signer binding),
/// then applies the threshold policy. Runs outside the state machine; the
/// runner delivers the boolean as a `BundleVerified` event.
pub fn verify_signature_request(
    request: &SignatureRequest,
    block: &Block,
    topology: &dyn TreeTopology,
) -> bool {
    let policy = ThresholdPolicy::new(topology.participant_count());
    let payload = block_signing_payload(block);

    let good_signatures = request
        .bundle
        .signatures
        .iter()
        .filter(|sig| verifies_under_some_roster_key(sig, &payload, topology))
        .count();

    debug!(
        participant = %topology.local_id(),
        good_signatures,
        total_signatures = request.bundle.signatures.len(),
        exceptions = request.bundle.exceptions.len(),
        threshold = policy.threshold(),
        "Verified signature request"
    );

    policy.evaluate(request.bundle.exceptions.len(), good_signatures)
}

fn verifies_under_some_roster_key(
    signature: &Signature,
    payload: &[u8],
    topology: &dyn TreeTopology,
) -> bool {
    topology.roster().iter().any(|&id| {
        topology
            .public_key(id)
            .is_some_and(|key| key.verify(payload, signature))
    })
}
