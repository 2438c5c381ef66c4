//! Errors raised by the bracket engine.

use crate::models::{MatchId, MatchStatus, ParticipantId, TournamentId, TournamentStatus};
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur during bracket operations.
#[derive(Debug, Error)]
pub enum BracketError {
    /// Participant count is not a power of two.
    #[error("Participant count {0} is not a power of two")]
    InvalidTopology(u32),

    /// Tournaments may only be created for 4, 8, 16, 32 or 64 participants.
    #[error("Unsupported participant count {0} (expected 4, 8, 16, 32 or 64)")]
    UnsupportedParticipantCount(u32),

    /// Bracket generation requested after the tournament left Draft.
    #[error("Bracket already generated (tournament is {0})")]
    AlreadyGenerated(TournamentStatus),

    #[error("Tournament not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },

    /// Roster size does not match the bracket size.
    #[error("Roster incomplete: need {expected} participants, have {actual}")]
    IncompleteRoster { expected: u32, actual: u32 },

    #[error("Roster is full ({0} participants)")]
    RosterFull(u32),

    /// Names are unique per tournament (case-insensitive).
    #[error("A participant named {0:?} already exists")]
    DuplicateParticipantName(String),

    #[error("Participant name must not be empty")]
    EmptyParticipantName,

    #[error("Seed {0} is already taken")]
    DuplicateSeed(u32),

    #[error("Seed must be at least 1")]
    InvalidSeed,

    /// The match still waits for one or both participants.
    #[error("Match {0} is not ready to be scored")]
    MatchNotReady(MatchId),

    /// A non-pending match with an empty participant slot.
    #[error("Match {0} is missing a participant")]
    IncompleteMatch(MatchId),

    #[error("Match {0} is already completed")]
    MatchAlreadyCompleted(MatchId),

    #[error("Match {id} cannot change state from {status}")]
    InvalidMatchState { id: MatchId, status: MatchStatus },

    #[error("Scores must be between 0 and 4294967295 (got {score1}-{score2})")]
    InvalidScore { score1: i64, score2: i64 },

    #[error("Draws are not allowed; report a decisive score")]
    DrawNotAllowed,

    #[error("Cannot reset a completed tournament")]
    CannotResetCompleted,

    /// Topology invariant violated; data-integrity fault, not user input.
    #[error("Bracket corrupted: {0}")]
    BracketCorruption(String),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BracketError {
    /// Lookup misses (tournament, match or participant).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BracketError::TournamentNotFound(_)
                | BracketError::MatchNotFound(_)
                | BracketError::ParticipantNotFound(_)
        )
    }

    /// Programmer or data-integrity faults, as opposed to rejected input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BracketError::BracketCorruption(_) | BracketError::Store(_)
        )
    }

    /// Message safe to show to a client; internal faults are not described.
    pub fn client_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
