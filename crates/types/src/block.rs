//! Block and BlockHeader types for the signing protocol.

use crate::{BlockHeight, Hash};
use serde::{Deserialize, Serialize};

/// An opaque transaction payload carried by a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction(pub Vec<u8>);

impl Transaction {
    /// Compute hash of this transaction.
    pub fn hash(&self) -> Hash {
        Hash::from_bytes(&self.0)
    }
}

/// Block header containing the metadata that round-2 signatures cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height in the chain (genesis = 0).
    pub height: BlockHeight,

    /// Hash of parent block.
    pub parent_hash: Hash,

    /// Merkle root over the block's transactions.
    pub merkle_root: Hash,

    /// Unix timestamp (milliseconds) when the block was proposed.
    pub timestamp: u64,
}

impl BlockHeader {
    /// Deterministic byte encoding of the header.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(80);
        bytes.extend_from_slice(&self.height.0.to_le_bytes());
        bytes.extend_from_slice(self.parent_hash.as_bytes());
        bytes.extend_from_slice(self.merkle_root.as_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes
    }

    /// Compute hash of this block header.
    pub fn hash(&self) -> Hash {
        Hash::from_bytes(&self.encode())
    }

    /// Check if this is the genesis block header.
    pub fn is_genesis(&self) -> bool {
        self.height.0 == 0
    }
}

/// Complete block with header and transaction body.
///
/// Identity is structural: two blocks with the same bytes are the same block.
/// The root owns the block for the duration of a run and distributes
/// immutable copies down the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block header with chain metadata.
    pub header: BlockHeader,

    /// Transactions included in this block.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build a block from a transaction list, computing the merkle root.
    pub fn from_transactions(
        height: BlockHeight,
        parent_hash: Hash,
        timestamp: u64,
        transactions: Vec<Transaction>,
    ) -> Self {
        let leaves: Vec<Hash> = transactions.iter().map(|tx| tx.hash()).collect();
        let merkle_root = merkle_root(&leaves);
        Self {
            header: BlockHeader {
                height,
                parent_hash,
                merkle_root,
                timestamp,
            },
            transactions,
        }
    }

    /// Deterministic byte encoding of the full block (header then body).
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = self.header.encode();
        bytes.extend_from_slice(&(self.transactions.len() as u64).to_le_bytes());
        for tx in &self.transactions {
            bytes.extend_from_slice(&(tx.0.len() as u64).to_le_bytes());
            bytes.extend_from_slice(&tx.0);
        }
        bytes
    }

    /// Compute hash of this block (hashes the header).
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Get block height.
    pub fn height(&self) -> BlockHeight {
        self.header.height
    }

    /// Get number of transactions in this block.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }
}

/// Hash two child nodes to produce the parent hash.
#[inline]
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_bytes());
    data[32..].copy_from_slice(right.as_bytes());
    Hash::from_bytes(&data)
}

/// Compute the merkle root of a list of leaf hashes.
///
/// Leaves are padded to the next power of two with zero hashes. An empty
/// list yields the zero hash.
fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return Hash::ZERO;
    }

    let n = leaves.len().next_power_of_two();
    let mut level = vec![Hash::ZERO; n];
    level[..leaves.len()].copy_from_slice(leaves);

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }

    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_block(payloads: &[&[u8]]) -> Block {
        let txs = payloads.iter().map(|p| Transaction(p.to_vec())).collect();
        Block::from_transactions(BlockHeight(1), Hash::ZERO, 1_700_000_000_000, txs)
    }

    #[test]
    fn test_structural_identity() {
        let a = test_block(&[b"tx1", b"tx2"]);
        let b = test_block(&[b"tx1", b"tx2"]);
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_different_transactions_different_root() {
        let a = test_block(&[b"tx1", b"tx2"]);
        let b = test_block(&[b"tx1", b"tx3"]);
        assert_ne!(a.header.merkle_root, b.header.merkle_root);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_merkle_root_single_and_odd() {
        let one = merkle_root(&[Hash::from_bytes(b"a")]);
        assert_eq!(one, Hash::from_bytes(b"a"));

        // Odd leaf count pads with zero hashes, still deterministic.
        let leaves = [
            Hash::from_bytes(b"a"),
            Hash::from_bytes(b"b"),
            Hash::from_bytes(b"c"),
        ];
        assert_eq!(merkle_root(&leaves), merkle_root(&leaves));
    }

    #[test]
    fn test_encode_distinguishes_header_and_body() {
        let block = test_block(&[b"tx1"]);
        let header_only = block.header.encode();
        let full = block.encode();
        assert!(full.len() > header_only.len());
        assert_eq!(&full[..header_only.len()], header_only.as_slice());
    }
}
