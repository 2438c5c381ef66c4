//! Score reporting: complete a match, knock out the loser, and move the winner into
//! the next round. Scoring the final hands over to finalization.

use crate::auth::AdminCapability;
use crate::error::{BracketError, BracketResult};
use crate::logic::directory::{
    eliminate_participant, get_match, get_tournament, matches_by_tournament,
    matches_in_round_ordered, update_tournament,
};
use crate::logic::finalization::finalize;
use crate::logic::topology::next_slot;
use crate::models::{
    BracketMatch, MatchId, MatchStatus, MatchUpdate, Participant, ParticipantId, Slot,
    Standings, Tournament, TournamentUpdate,
};
use crate::store::RecordStore;
use serde::Serialize;

/// What a reported score changed.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreReport {
    pub completed: BracketMatch,
    pub eliminated: Participant,
    /// Destination match after the winner was seated; None for the final.
    pub advanced_to: Option<BracketMatch>,
    /// Written when the final was scored.
    pub standings: Option<Standings>,
    pub current_round: u32,
}

fn corruption(message: String) -> BracketError {
    log::error!("Bracket corruption: {message}");
    BracketError::BracketCorruption(message)
}

/// Record the result of a match and advance the bracket.
///
/// Scores arrive as signed integers so negative input can be rejected rather than
/// wrapped. Completed matches cannot be scored again.
pub fn update_score<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    match_id: MatchId,
    score1: i64,
    score2: i64,
) -> BracketResult<ScoreReport> {
    let m = get_match(store, match_id)?;
    match m.status {
        MatchStatus::Pending => return Err(BracketError::MatchNotReady(match_id)),
        MatchStatus::Completed => return Err(BracketError::MatchAlreadyCompleted(match_id)),
        MatchStatus::Upcoming | MatchStatus::Live => {}
    }
    let (Some(p1), Some(p2)) = (m.participant1_id, m.participant2_id) else {
        return Err(BracketError::IncompleteMatch(match_id));
    };
    let (Ok(s1), Ok(s2)) = (u32::try_from(score1), u32::try_from(score2)) else {
        return Err(BracketError::InvalidScore { score1, score2 });
    };
    if s1 == s2 {
        return Err(BracketError::DrawNotAllowed);
    }
    let (winner, loser) = if s1 > s2 { (p1, p2) } else { (p2, p1) };

    // Resolve where the winner goes before anything is written, so a broken bracket
    // leaves this match scoreable.
    let tournament = get_tournament(store, m.tournament_id)?;
    let is_final = m.round == tournament.total_rounds;
    let destination = if is_final {
        None
    } else {
        Some(find_destination(store, &tournament, &m)?)
    };

    let completed: BracketMatch = store.update(
        match_id,
        MatchUpdate {
            winner_id: Some(Some(winner)),
            score1: Some(Some(s1)),
            score2: Some(Some(s2)),
            status: Some(MatchStatus::Completed),
            ..MatchUpdate::default()
        },
    )?;
    let eliminated = eliminate_participant(store, loser, m.round)?;
    log::debug!(
        "Match #{} (round {}) scored {}-{}; {} eliminated",
        m.match_number,
        m.round,
        s1,
        s2,
        loser
    );

    let Some((destination, slot)) = destination else {
        let standings = finalize(store, &tournament, winner, loser)?;
        return Ok(ScoreReport {
            completed,
            eliminated,
            advanced_to: None,
            standings: Some(standings),
            current_round: tournament.total_rounds,
        });
    };

    let advanced_to = seat_winner(store, destination, slot, winner)?;
    let current_round = refresh_current_round(store, &tournament)?;
    Ok(ScoreReport {
        completed,
        eliminated,
        advanced_to: Some(advanced_to),
        standings: None,
        current_round,
    })
}

/// The next-round match (and slot) that the winner of `m` moves into.
fn find_destination<S: RecordStore>(
    store: &S,
    tournament: &Tournament,
    m: &BracketMatch,
) -> BracketResult<(BracketMatch, Slot)> {
    let next = next_slot(tournament.participant_count, m.round, m.match_number)
        .ok_or_else(|| {
            corruption(format!(
                "match #{} is not a valid position in round {} of a {}-participant bracket",
                m.match_number, m.round, tournament.participant_count
            ))
        })?;
    let destination = matches_in_round_ordered(store, tournament.id, next.round)?
        .into_iter()
        .nth(next.index as usize)
        .ok_or_else(|| {
            corruption(format!(
                "no match at index {} of round {} for tournament {}",
                next.index, next.round, tournament.id
            ))
        })?;
    Ok((destination, next.slot))
}

fn seat_winner<S: RecordStore>(
    store: &mut S,
    destination: BracketMatch,
    slot: Slot,
    winner: ParticipantId,
) -> BracketResult<BracketMatch> {
    let mut seated: BracketMatch = store.update(destination.id, MatchUpdate::seat(slot, winner))?;
    if seated.is_full() && seated.status == MatchStatus::Pending {
        seated = store.update(seated.id, MatchUpdate::status(MatchStatus::Upcoming))?;
    }
    log::debug!(
        "{} advanced to match #{} slot {:?}",
        winner,
        seated.match_number,
        slot
    );
    Ok(seated)
}

/// Lowest round that still has an unfinished match (or the final round when none do).
pub fn lowest_open_round(matches: &[BracketMatch], total_rounds: u32) -> u32 {
    matches
        .iter()
        .filter(|m| m.status != MatchStatus::Completed)
        .map(|m| m.round)
        .min()
        .unwrap_or(total_rounds)
}

fn refresh_current_round<S: RecordStore>(
    store: &mut S,
    tournament: &Tournament,
) -> BracketResult<u32> {
    let matches = matches_by_tournament(store, tournament.id)?;
    let round = lowest_open_round(&matches, tournament.total_rounds);
    if round != tournament.current_round {
        update_tournament(store, tournament.id, TournamentUpdate::current_round(round))?;
        log::info!("Tournament {} moved to round {}", tournament.id, round);
    }
    Ok(round)
}

/// Mark an upcoming match as being played.
pub fn mark_live<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    match_id: MatchId,
) -> BracketResult<BracketMatch> {
    let m = get_match(store, match_id)?;
    if m.status != MatchStatus::Upcoming {
        return Err(BracketError::InvalidMatchState {
            id: match_id,
            status: m.status,
        });
    }
    Ok(store.update::<BracketMatch>(match_id, MatchUpdate::status(MatchStatus::Live))?)
}
