//! Tournament record and TournamentStatus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Participant counts a tournament may be created with.
pub const SUPPORTED_PARTICIPANT_COUNTS: [u32; 5] = [4, 8, 16, 32, 64];

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// No bracket yet; roster may change.
    #[default]
    Draft,
    /// Bracket generated, waiting for seeding.
    Registration,
    /// Round-1 seeded; scores are being reported.
    Ongoing,
    /// Final scored and standings written.
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentStatus::Draft => "draft",
            TournamentStatus::Registration => "registration",
            TournamentStatus::Ongoing => "ongoing",
            TournamentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A single-elimination tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Always a power of two once a bracket exists.
    pub participant_count: u32,
    /// `log2(participant_count)`; fixed once the bracket is generated.
    pub total_rounds: u32,
    pub current_round: u32,
    pub status: TournamentStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a tournament in Draft. `total_rounds` is filled in when the bracket is generated.
    pub fn new(name: impl Into<String>, participant_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            participant_count,
            total_rounds: 0,
            current_round: 1,
            status: TournamentStatus::Draft,
            start_date: None,
            end_date: None,
        }
    }

    /// Whether the final round has been reached and scored.
    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }
}

/// Partial update for a tournament. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TournamentUpdate {
    pub total_rounds: Option<u32>,
    pub current_round: Option<u32>,
    pub status: Option<TournamentStatus>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}

impl TournamentUpdate {
    pub fn status(status: TournamentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn current_round(round: u32) -> Self {
        Self {
            current_round: Some(round),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, t: &mut Tournament) {
        if let Some(v) = self.total_rounds {
            t.total_rounds = v;
        }
        if let Some(v) = self.current_round {
            t.current_round = v;
        }
        if let Some(v) = self.status {
            t.status = v;
        }
        if let Some(v) = self.start_date {
            t.start_date = v;
        }
        if let Some(v) = self.end_date {
            t.end_date = v;
        }
    }
}
