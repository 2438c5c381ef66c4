//! Final standings written once a tournament's final is scored.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a standings record.
pub type StandingsId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub id: StandingsId,
    pub tournament_id: TournamentId,
    pub champion_id: ParticipantId,
    pub runner_up_id: ParticipantId,
    /// Losers of the semifinal round (two for any bracket of 4 or more).
    pub third_place_ids: Vec<ParticipantId>,
    pub total_matches: u32,
    pub total_participants: u32,
    pub created_at: DateTime<Utc>,
}
