//! Single-elimination tournament organizer: bracket engine, record store, and REST API.

pub mod auth;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod store;
pub mod web;

pub use auth::{AdminCapability, AdminKey};
pub use config::ServerConfig;
pub use error::{BracketError, BracketResult};
pub use logic::{
    assign_participants, create_tournament, generate_bracket, get_bracket_view, get_match_view,
    get_standings, mark_live, register_participant, reset_bracket, update_score,
    withdraw_participant, BracketView, MatchView, RoundView, ScoreReport,
};
pub use models::{
    BracketMatch, MatchId, MatchStatus, Participant, ParticipantId, ParticipantStatus, Slot,
    Standings, Tournament, TournamentId, TournamentStatus,
};
pub use store::{MemoryStore, Record, RecordStore, StoreError, Updatable};
