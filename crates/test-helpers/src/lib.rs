//! Deterministic fixtures for treesign tests.
//!
//! Keys are derived from fixed seeds so every test run sees the same roster
//! and the same signatures.

use treesign_types::{
    Block, BlockHeight, Hash, KeyPair, ParticipantId, ParticipantInfo, StaticTree, Transaction,
};

/// Generate `n` deterministic keypairs.
pub fn fixture_keypairs(n: u64) -> Vec<KeyPair> {
    (0..n)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[..8].copy_from_slice(&i.to_le_bytes());
            seed[31] = 0x5a;
            KeyPair::from_seed(&seed)
        })
        .collect()
}

/// Build a roster pairing `ParticipantId(i)` with the i-th key.
pub fn fixture_roster(keys: &[KeyPair]) -> Vec<ParticipantInfo> {
    keys.iter()
        .enumerate()
        .map(|(i, key)| ParticipantInfo {
            participant_id: ParticipantId(i as u64),
            public_key: key.public_key(),
        })
        .collect()
}

/// Build one `StaticTree` view per roster participant.
pub fn fixture_tree_views(roster: &[ParticipantInfo], branching: usize) -> Vec<StaticTree> {
    roster
        .iter()
        .map(|p| {
            StaticTree::new(p.participant_id, roster, branching)
                .expect("fixture roster is well-formed")
        })
        .collect()
}

/// Build a small deterministic block with `transactions` payloads.
pub fn fixture_block(transactions: u64) -> Block {
    let txs = (0..transactions)
        .map(|i| Transaction(format!("tx-{i}").into_bytes()))
        .collect();
    Block::from_transactions(BlockHeight(1), Hash::ZERO, 1_700_000_000_000, txs)
}
