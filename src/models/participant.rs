//! Participant: a confirmed entrant with the rating used for seeding.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in match slots and results).
pub type ParticipantId = Uuid;

/// A confirmed tournament participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Numeric rating (e.g. ELO) used by rating seeding.
    pub seed_value: u32,
    /// 1-based position in the seeded order; 0 until seeded.
    #[serde(default)]
    pub display_seed_index: u32,
}

impl Participant {
    /// Create a new participant with a fresh id. Not yet seeded.
    pub fn new(name: impl Into<String>, seed_value: u32) -> Self {
        Self::with_id(Uuid::new_v4(), name, seed_value)
    }

    /// Create a participant with a known id (e.g. a user id from the profile service).
    pub fn with_id(id: ParticipantId, name: impl Into<String>, seed_value: u32) -> Self {
        Self {
            id,
            name: name.into(),
            seed_value,
            display_seed_index: 0,
        }
    }
}
