//! Data structures for the bracket: tournaments, participants, matches, standings.

mod bracket_match;
mod participant;
mod standings;
mod tournament;

pub use bracket_match::{BracketMatch, MatchId, MatchStatus, MatchUpdate, Slot};
pub use participant::{Participant, ParticipantId, ParticipantStatus, ParticipantUpdate};
pub use standings::{Standings, StandingsId};
pub use tournament::{
    Tournament, TournamentId, TournamentStatus, TournamentUpdate, SUPPORTED_PARTICIPANT_COUNTS,
};
