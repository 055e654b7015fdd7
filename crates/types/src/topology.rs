//! Tree topology trait and static implementation.
//!
//! The overlay that actually delivers messages is external; this trait is
//! the view a participant needs of the spanning tree: its parent, its
//! ordered children, and the full roster with public keys.

use crate::{ParticipantId, PublicKey};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-participant view of the signing tree.
pub trait TreeTopology: Send + Sync {
    /// Get the local participant's ID.
    fn local_id(&self) -> ParticipantId;

    /// Get the parent participant (None for the root).
    fn parent(&self) -> Option<ParticipantId>;

    /// Get the ordered children of the local participant.
    fn children(&self) -> &[ParticipantId];

    /// Get the full ordered roster of the tree.
    fn roster(&self) -> &[ParticipantId];

    /// Get the public key for a participant.
    fn public_key(&self, id: ParticipantId) -> Option<PublicKey>;

    // Derived methods

    /// Check if the local participant is the root.
    fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Check if the local participant is a leaf.
    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Total number of participants in the tree.
    fn participant_count(&self) -> usize {
        self.roster().len()
    }

    /// Number of immediate children.
    fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Check if a participant is an immediate child of the local one.
    fn is_child(&self, id: ParticipantId) -> bool {
        self.children().contains(&id)
    }

    /// Maximum tolerated Byzantine participants: f = ceil(N / 3).
    fn byzantine_threshold(&self) -> usize {
        self.participant_count().div_ceil(3)
    }
}

/// Errors that can occur when building a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The roster was empty.
    #[error("cannot build a tree over an empty roster")]
    EmptyRoster,

    /// The branching factor was zero.
    #[error("branching factor must be at least 1")]
    ZeroBranching,

    /// The local participant is not in the roster.
    #[error("participant {0} is not in the roster")]
    NotInRoster(ParticipantId),
}

/// Roster entry: a participant and its public key.
#[derive(Debug, Clone)]
pub struct ParticipantInfo {
    /// The participant's identifier.
    pub participant_id: ParticipantId,

    /// The participant's public key.
    pub public_key: PublicKey,
}

/// A static balanced k-ary tree over an ordered roster.
///
/// The participant at roster index 0 is the root; index i's parent is at
/// (i - 1) / k and its children at k*i + 1 ..= k*i + k.
#[derive(Debug, Clone)]
pub struct StaticTree {
    local_id: ParticipantId,
    parent: Option<ParticipantId>,
    children: Vec<ParticipantId>,
    roster: Vec<ParticipantId>,
    public_keys: HashMap<ParticipantId, PublicKey>,
}

impl StaticTree {
    /// Build the local view for `local_id` over a roster with branching
    /// factor `branching`.
    pub fn new(
        local_id: ParticipantId,
        participants: &[ParticipantInfo],
        branching: usize,
    ) -> Result<Self, TreeError> {
        if participants.is_empty() {
            return Err(TreeError::EmptyRoster);
        }
        if branching == 0 {
            return Err(TreeError::ZeroBranching);
        }

        let roster: Vec<ParticipantId> =
            participants.iter().map(|p| p.participant_id).collect();
        let index = roster
            .iter()
            .position(|&id| id == local_id)
            .ok_or(TreeError::NotInRoster(local_id))?;

        let parent = if index == 0 {
            None
        } else {
            Some(roster[(index - 1) / branching])
        };

        let first_child = branching * index + 1;
        let children: Vec<ParticipantId> = (first_child..first_child + branching)
            .take_while(|&i| i < roster.len())
            .map(|i| roster[i])
            .collect();

        let public_keys = participants
            .iter()
            .map(|p| (p.participant_id, p.public_key.clone()))
            .collect();

        Ok(Self {
            local_id,
            parent,
            children,
            roster,
            public_keys,
        })
    }

    /// Create a topology as an Arc.
    pub fn into_arc(self) -> Arc<dyn TreeTopology> {
        Arc::new(self)
    }
}

impl TreeTopology for StaticTree {
    fn local_id(&self) -> ParticipantId {
        self.local_id
    }

    fn parent(&self) -> Option<ParticipantId> {
        self.parent
    }

    fn children(&self) -> &[ParticipantId] {
        &self.children
    }

    fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    fn public_key(&self, id: ParticipantId) -> Option<PublicKey> {
        self.public_keys.get(&id).cloned()
    }
}
