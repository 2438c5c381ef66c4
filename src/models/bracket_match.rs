//! Bracket match, MatchStatus, and Slot for 1v1 elimination games.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two participant positions in a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting for one or both participants.
    #[default]
    Pending,
    /// Both participants known; ready to play.
    Upcoming,
    /// Manually marked as in progress.
    Live,
    Completed,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A single match in the bracket tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based round; `total_rounds` is the final.
    pub round: u32,
    /// Global, 1-based, round-major numbering across the whole tournament.
    pub match_number: u32,
    pub participant1_id: Option<ParticipantId>,
    pub participant2_id: Option<ParticipantId>,
    /// None if not yet played.
    pub winner_id: Option<ParticipantId>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub status: MatchStatus,
}

impl BracketMatch {
    /// Empty placeholder for a bracket position.
    pub fn placeholder(tournament_id: TournamentId, round: u32, match_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            match_number,
            participant1_id: None,
            participant2_id: None,
            winner_id: None,
            score1: None,
            score2: None,
            status: MatchStatus::Pending,
        }
    }

    pub fn is_full(&self) -> bool {
        self.participant1_id.is_some() && self.participant2_id.is_some()
    }

    /// The participant who did not win, once a winner is recorded.
    pub fn loser_id(&self) -> Option<ParticipantId> {
        let winner = self.winner_id?;
        if self.participant1_id == Some(winner) {
            self.participant2_id
        } else {
            self.participant1_id
        }
    }
}

/// Partial update for a match.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MatchUpdate {
    pub participant1_id: Option<Option<ParticipantId>>,
    pub participant2_id: Option<Option<ParticipantId>>,
    pub winner_id: Option<Option<ParticipantId>>,
    pub score1: Option<Option<u32>>,
    pub score2: Option<Option<u32>>,
    pub status: Option<MatchStatus>,
}

impl MatchUpdate {
    pub fn status(status: MatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Put `participant` into `slot`.
    pub fn seat(slot: Slot, participant: ParticipantId) -> Self {
        match slot {
            Slot::One => Self {
                participant1_id: Some(Some(participant)),
                ..Self::default()
            },
            Slot::Two => Self {
                participant2_id: Some(Some(participant)),
                ..Self::default()
            },
        }
    }

    pub(crate) fn apply_to(self, m: &mut BracketMatch) {
        if let Some(v) = self.participant1_id {
            m.participant1_id = v;
        }
        if let Some(v) = self.participant2_id {
            m.participant2_id = v;
        }
        if let Some(v) = self.winner_id {
            m.winner_id = v;
        }
        if let Some(v) = self.score1 {
            m.score1 = v;
        }
        if let Some(v) = self.score2 {
            m.score2 = v;
        }
        if let Some(v) = self.status {
            m.status = v;
        }
    }
}
