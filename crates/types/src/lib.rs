//! Core types for the Ntree tree-signing protocol.
//!
//! This crate holds the data model shared by every other crate in the
//! workspace: identifiers, the block being signed, the ed25519 signing
//! primitive, signature bundles, domain-separated signing payloads, and the
//! spanning-tree topology the protocol runs over.

mod block;
mod bundle;
mod crypto;
mod hash;
mod identifiers;
mod signing;
mod topology;
mod validator;

pub use block::{Block, BlockHeader, Transaction};
pub use bundle::{Exception, SignatureBundle};
pub use crypto::{KeyPair, PublicKey, Signature};
pub use hash::{Hash, HexError};
pub use identifiers::{BlockHeight, ParticipantId};
pub use signing::{
    block_signing_payload, header_signing_payload, DOMAIN_BLOCK_SIGNATURE,
    DOMAIN_SIGNATURE_RESPONSE,
};
pub use topology::{ParticipantInfo, StaticTree, TreeError, TreeTopology};
pub use validator::{AcceptAll, BlockValidator, FixedVerdict};
