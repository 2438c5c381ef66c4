//! Bracket shape: round/match counts, global match numbering, and winner destinations.
//!
//! Everything here except [`generate_bracket`] is a pure function of the participant
//! count. Positions are always re-derived from `(participant_count, round)`; nothing
//! about the layout is cached on the tournament besides `total_rounds`.

use crate::auth::AdminCapability;
use crate::error::{BracketError, BracketResult};
use crate::logic::directory::{get_tournament, update_tournament};
use crate::models::{BracketMatch, Slot, TournamentId, TournamentStatus, TournamentUpdate};
use crate::store::RecordStore;
use serde::Serialize;

/// `n > 0 && n & (n - 1) == 0`
pub fn is_power_of_two(n: u32) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// `log2(participant_count)`; fails for counts that are not a power of two.
pub fn total_rounds(participant_count: u32) -> BracketResult<u32> {
    if !is_power_of_two(participant_count) {
        return Err(BracketError::InvalidTopology(participant_count));
    }
    Ok(participant_count.trailing_zeros())
}

/// Matches in `round` (1-based): `participant_count / 2^round`.
pub fn matches_in_round(participant_count: u32, round: u32) -> u32 {
    participant_count.checked_shr(round).unwrap_or(0)
}

/// Global match number at which `round` begins.
pub fn first_match_number_of_round(participant_count: u32, round: u32) -> u32 {
    1 + (1..round)
        .map(|k| matches_in_round(participant_count, k))
        .sum::<u32>()
}

/// Display name of a round, by how many rounds remain after it.
pub fn round_name(round: u32, total_rounds: u32) -> String {
    match total_rounds.checked_sub(round) {
        Some(0) => "Final".to_string(),
        Some(1) => "Semifinal".to_string(),
        Some(2) => "Quarterfinal".to_string(),
        Some(3) => "Round of 16".to_string(),
        Some(4) => "Round of 32".to_string(),
        Some(5) => "Round of 64".to_string(),
        _ => format!("Round {round}"),
    }
}

/// Where the winner of a match goes in the following round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct NextSlot {
    pub round: u32,
    /// 0-based position of the destination match within `round`.
    pub index: u32,
    pub slot: Slot,
}

/// Destination of the winner of match `match_number` in `round`.
///
/// Returns `None` for the final (nothing to advance to) and for a match number that
/// does not belong to `round`.
pub fn next_slot(participant_count: u32, round: u32, match_number: u32) -> Option<NextSlot> {
    let total = total_rounds(participant_count).ok()?;
    if round == 0 || round >= total {
        return None;
    }
    let index_in_round =
        match_number.checked_sub(first_match_number_of_round(participant_count, round))?;
    if index_in_round >= matches_in_round(participant_count, round) {
        return None;
    }
    let slot = if index_in_round % 2 == 0 {
        Slot::One
    } else {
        Slot::Two
    };
    Some(NextSlot {
        round: round + 1,
        index: index_in_round / 2,
        slot,
    })
}

/// Empty match placeholders for every round, numbered round-major from 1.
pub fn build_matches(
    tournament_id: TournamentId,
    participant_count: u32,
) -> BracketResult<Vec<BracketMatch>> {
    let rounds = total_rounds(participant_count)?;
    let mut matches = Vec::with_capacity(participant_count.saturating_sub(1) as usize);
    let mut number = 1;
    for round in 1..=rounds {
        for _ in 0..matches_in_round(participant_count, round) {
            matches.push(BracketMatch::placeholder(tournament_id, round, number));
            number += 1;
        }
    }
    Ok(matches)
}

/// Create every match of the bracket (all Pending) and move the tournament to Registration.
pub fn generate_bracket<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    tournament_id: TournamentId,
) -> BracketResult<Vec<BracketMatch>> {
    let tournament = get_tournament(store, tournament_id)?;
    if tournament.status != TournamentStatus::Draft {
        return Err(BracketError::AlreadyGenerated(tournament.status));
    }
    let rounds = total_rounds(tournament.participant_count)?;
    let matches = build_matches(tournament_id, tournament.participant_count)?;
    for m in &matches {
        store.insert(m.clone())?;
    }
    update_tournament(
        store,
        tournament_id,
        TournamentUpdate {
            total_rounds: Some(rounds),
            current_round: Some(1),
            status: Some(TournamentStatus::Registration),
            ..TournamentUpdate::default()
        },
    )?;
    log::info!(
        "Generated bracket for tournament {}: {} participants, {} rounds, {} matches",
        tournament_id,
        tournament.participant_count,
        rounds,
        matches.len()
    );
    Ok(matches)
}
