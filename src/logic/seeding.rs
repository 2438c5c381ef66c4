//! Seeding: place the roster into round 1 (1 vs N, 2 vs N-1, ...) and start the tournament.

use crate::auth::AdminCapability;
use crate::error::{BracketError, BracketResult};
use crate::logic::directory::{
    get_tournament, matches_in_round_ordered, participants_by_tournament, update_tournament,
};
use crate::models::{
    BracketMatch, MatchStatus, MatchUpdate, Participant, TournamentId, TournamentStatus,
    TournamentUpdate,
};
use crate::store::RecordStore;
use chrono::Utc;
use std::cmp::Ordering;

/// Seeded participants first by ascending seed, then unseeded ones in their original order.
pub fn seed_order(mut participants: Vec<Participant>) -> Vec<Participant> {
    // sort_by is stable, so unseeded entries keep their relative order.
    participants.sort_by(|a, b| match (a.seed, b.seed) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    participants
}

/// Pair a seed-ordered list from both ends: `(p[i], p[n-1-i])` for `i < n/2`.
pub fn seed_pairs<T: Clone>(ordered: &[T]) -> Vec<(T, T)> {
    let n = ordered.len();
    (0..n / 2)
        .map(|i| (ordered[i].clone(), ordered[n - 1 - i].clone()))
        .collect()
}

/// Fill round 1 from the seeded roster and move the tournament to Ongoing.
///
/// Requires a generated bracket (Registration) and exactly `participant_count` participants.
/// Returns the round-1 matches as written.
pub fn assign_participants<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    tournament_id: TournamentId,
) -> BracketResult<Vec<BracketMatch>> {
    let tournament = get_tournament(store, tournament_id)?;
    if tournament.status != TournamentStatus::Registration {
        return Err(BracketError::InvalidState {
            expected: TournamentStatus::Registration,
            actual: tournament.status,
        });
    }

    let roster = participants_by_tournament(store, tournament_id)?;
    if roster.len() as u32 != tournament.participant_count {
        return Err(BracketError::IncompleteRoster {
            expected: tournament.participant_count,
            actual: roster.len() as u32,
        });
    }

    let ordered = seed_order(roster);
    let pairs = seed_pairs(&ordered);
    let first_round = matches_in_round_ordered(store, tournament_id, 1)?;
    if first_round.len() != pairs.len() {
        log::error!(
            "Tournament {} has {} round-1 matches, expected {}",
            tournament_id,
            first_round.len(),
            pairs.len()
        );
        return Err(BracketError::BracketCorruption(format!(
            "round 1 has {} matches, expected {}",
            first_round.len(),
            pairs.len()
        )));
    }

    let mut seeded = Vec::with_capacity(first_round.len());
    for (m, (top, bottom)) in first_round.iter().zip(pairs) {
        let updated: BracketMatch = store.update(
            m.id,
            MatchUpdate {
                participant1_id: Some(Some(top.id)),
                participant2_id: Some(Some(bottom.id)),
                status: Some(MatchStatus::Upcoming),
                ..MatchUpdate::default()
            },
        )?;
        seeded.push(updated);
    }

    update_tournament(
        store,
        tournament_id,
        TournamentUpdate {
            status: Some(TournamentStatus::Ongoing),
            current_round: Some(1),
            start_date: Some(Some(Utc::now())),
            ..TournamentUpdate::default()
        },
    )?;
    log::info!(
        "Seeded {} round-1 matches for tournament {}; tournament started",
        seeded.len(),
        tournament_id
    );
    Ok(seeded)
}
