//! Reset: throw the bracket away so it can be regenerated after a roster correction.

use crate::auth::AdminCapability;
use crate::error::{BracketError, BracketResult};
use crate::logic::directory::{get_tournament, participants_by_tournament, update_tournament};
use crate::models::{
    BracketMatch, Participant, ParticipantUpdate, Standings, Tournament, TournamentId,
    TournamentStatus, TournamentUpdate,
};
use crate::store::RecordStore;

/// Delete all matches and standings, reactivate every participant, and return to Draft.
/// Completed tournaments cannot be reset.
pub fn reset_bracket<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    tournament_id: TournamentId,
) -> BracketResult<Tournament> {
    let tournament = get_tournament(store, tournament_id)?;
    if tournament.is_completed() {
        return Err(BracketError::CannotResetCompleted);
    }

    let removed_matches =
        store.delete_where(|m: &BracketMatch| m.tournament_id == tournament_id)?;
    store.delete_where(|s: &Standings| s.tournament_id == tournament_id)?;
    for p in participants_by_tournament(store, tournament_id)? {
        store.update::<Participant>(p.id, ParticipantUpdate::reactivated())?;
    }

    let tournament = update_tournament(
        store,
        tournament_id,
        TournamentUpdate {
            status: Some(TournamentStatus::Draft),
            current_round: Some(1),
            start_date: Some(None),
            end_date: Some(None),
            ..TournamentUpdate::default()
        },
    )?;
    log::info!(
        "Reset tournament {}: removed {} match(es)",
        tournament_id,
        removed_matches
    );
    Ok(tournament)
}
