//! Finalization: write the standings once the final is scored and close the tournament.

use crate::error::BracketResult;
use crate::logic::directory::{
    matches_by_tournament, matches_in_round_ordered, participants_by_tournament,
    update_tournament,
};
use crate::models::{
    ParticipantId, Standings, Tournament, TournamentId, TournamentStatus, TournamentUpdate,
};
use crate::store::RecordStore;
use chrono::Utc;
use uuid::Uuid;

/// Standings of a tournament, if it has been finalized.
pub fn get_standings<S: RecordStore>(
    store: &S,
    tournament_id: TournamentId,
) -> BracketResult<Option<Standings>> {
    Ok(store
        .find(|s: &Standings| s.tournament_id == tournament_id)?
        .into_iter()
        .next())
}

/// Write standings and mark the tournament Completed.
///
/// If standings already exist for the tournament they are returned unchanged.
pub(crate) fn finalize<S: RecordStore>(
    store: &mut S,
    tournament: &Tournament,
    champion_id: ParticipantId,
    runner_up_id: ParticipantId,
) -> BracketResult<Standings> {
    if let Some(existing) = get_standings(store, tournament.id)? {
        log::warn!(
            "Tournament {} already finalized; keeping existing standings",
            tournament.id
        );
        return Ok(existing);
    }

    let third_place_ids: Vec<ParticipantId> = if tournament.total_rounds >= 2 {
        matches_in_round_ordered(store, tournament.id, tournament.total_rounds - 1)?
            .iter()
            .filter_map(|m| m.loser_id())
            .collect()
    } else {
        Vec::new()
    };

    let total_matches = matches_by_tournament(store, tournament.id)?.len() as u32;
    let total_participants = participants_by_tournament(store, tournament.id)?.len() as u32;
    let now = Utc::now();
    let standings = store.insert(Standings {
        id: Uuid::new_v4(),
        tournament_id: tournament.id,
        champion_id,
        runner_up_id,
        third_place_ids,
        total_matches,
        total_participants,
        created_at: now,
    })?;

    update_tournament(
        store,
        tournament.id,
        TournamentUpdate {
            status: Some(TournamentStatus::Completed),
            current_round: Some(tournament.total_rounds),
            end_date: Some(Some(now)),
            ..TournamentUpdate::default()
        },
    )?;
    log::info!(
        "Tournament {} completed: champion {}, runner-up {}",
        tournament.id,
        champion_id,
        runner_up_id
    );
    Ok(standings)
}
