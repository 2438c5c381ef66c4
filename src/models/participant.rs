//! Participant record and ParticipantStatus.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = Uuid;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Active,
    Eliminated,
    Withdrawn,
}

/// A participant registered to exactly one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub name: String,
    /// Bracket placement rank (1 is the top seed). Unseeded entries sort last.
    pub seed: Option<u32>,
    pub status: ParticipantStatus,
    pub eliminated_at_round: Option<u32>,
}

impl Participant {
    /// Create an active participant.
    pub fn new(tournament_id: TournamentId, name: impl Into<String>, seed: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            seed,
            status: ParticipantStatus::Active,
            eliminated_at_round: None,
        }
    }

    pub fn is_eliminated(&self) -> bool {
        self.status == ParticipantStatus::Eliminated
    }
}

/// Partial update for a participant.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParticipantUpdate {
    pub status: Option<ParticipantStatus>,
    pub eliminated_at_round: Option<Option<u32>>,
}

impl ParticipantUpdate {
    /// Knock the participant out in `round`.
    pub fn eliminated(round: u32) -> Self {
        Self {
            status: Some(ParticipantStatus::Eliminated),
            eliminated_at_round: Some(Some(round)),
            ..Self::default()
        }
    }

    /// Back to active with no elimination round (used by reset).
    pub fn reactivated() -> Self {
        Self {
            status: Some(ParticipantStatus::Active),
            eliminated_at_round: Some(None),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, p: &mut Participant) {
        if let Some(v) = self.status {
            p.status = v;
        }
        if let Some(v) = self.eliminated_at_round {
            p.eliminated_at_round = v;
        }
    }
}
