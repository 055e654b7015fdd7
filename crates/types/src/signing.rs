//! Domain-separated signing payloads for the two protocol rounds.
//!
//! Round 1 signs the full block encoding, round 2 signs the header-only
//! encoding, and each payload carries a distinct domain tag. A round-1
//! signature can therefore never be replayed as a round-2 contribution.
//!
//! | Tag | Purpose |
//! |-----|---------|
//! | `ntree_block:` | Round-1 block signatures |
//! | `ntree_header:` | Round-2 signature responses |

use crate::{Block, BlockHeader};

/// Domain tag for round-1 block signatures.
///
/// Format: `ntree_block:` || block encoding
pub const DOMAIN_BLOCK_SIGNATURE: &[u8] = b"ntree_block:";

/// Domain tag for round-2 signature responses.
///
/// Format: `ntree_header:` || header encoding
pub const DOMAIN_SIGNATURE_RESPONSE: &[u8] = b"ntree_header:";

/// Build the round-1 signing payload for a block.
pub fn block_signing_payload(block: &Block) -> Vec<u8> {
    let encoded = block.encode();
    let mut payload = Vec::with_capacity(DOMAIN_BLOCK_SIGNATURE.len() + encoded.len());
    payload.extend_from_slice(DOMAIN_BLOCK_SIGNATURE);
    payload.extend_from_slice(&encoded);
    payload
}

/// Build the round-2 signing payload for a block header.
pub fn header_signing_payload(header: &BlockHeader) -> Vec<u8> {
    let encoded = header.encode();
    let mut payload = Vec::with_capacity(DOMAIN_SIGNATURE_RESPONSE.len() + encoded.len());
    payload.extend_from_slice(DOMAIN_SIGNATURE_RESPONSE);
    payload.extend_from_slice(&encoded);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockHeight, Hash, KeyPair, Transaction};

    fn test_block() -> Block {
        Block::from_transactions(
            BlockHeight(1),
            Hash::ZERO,
            0,
            vec![Transaction(b"tx".to_vec())],
        )
    }

    #[test]
    fn test_payloads_deterministic() {
        let block = test_block();
        assert_eq!(block_signing_payload(&block), block_signing_payload(&block));
        assert_eq!(
            header_signing_payload(&block.header),
            header_signing_payload(&block.header)
        );
    }

    #[test]
    fn test_rounds_are_domain_separated() {
        let block = test_block();
        let round1 = block_signing_payload(&block);
        let round2 = header_signing_payload(&block.header);

        assert!(round1.starts_with(DOMAIN_BLOCK_SIGNATURE));
        assert!(round2.starts_with(DOMAIN_SIGNATURE_RESPONSE));
        assert_ne!(round1, round2);
    }

    #[test]
    fn test_round_signatures_never_interchangeable() {
        // Same key, same block: round-1 and round-2 signatures must differ
        // as byte strings.
        let block = test_block();
        let keypair = KeyPair::from_seed(&[7u8; 32]);

        let sig1 = keypair.sign(&block_signing_payload(&block));
        let sig2 = keypair.sign(&header_signing_payload(&block.header));
        assert_ne!(sig1.to_bytes(), sig2.to_bytes());

        // And a round-1 signature does not verify against the round-2 payload.
        let pubkey = keypair.public_key();
        assert!(!pubkey.verify(&header_signing_payload(&block.header), &sig1));
    }
}
