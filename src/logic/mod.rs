//! Bracket engine: topology, seeding, score advancement, finalization, reset, and views.

mod advancement;
mod directory;
mod finalization;
mod reset;
mod seeding;
mod topology;
mod view;

pub use advancement::{lowest_open_round, mark_live, update_score, ScoreReport};
pub use directory::{
    create_tournament, eliminate_participant, get_match, get_participant, get_tournament,
    matches_by_tournament, matches_in_round_ordered, participants_by_tournament,
    register_participant, update_tournament, withdraw_participant,
};
pub use finalization::get_standings;
pub use reset::reset_bracket;
pub use seeding::{assign_participants, seed_order, seed_pairs};
pub use topology::{
    build_matches, first_match_number_of_round, generate_bracket, is_power_of_two,
    matches_in_round, next_slot, round_name, total_rounds, NextSlot,
};
pub use view::{get_bracket_view, get_match_view, BracketView, MatchView, RoundView};
