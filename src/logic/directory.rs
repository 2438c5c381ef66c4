//! Typed accessors over the record store plus the small amount of roster editing
//! needed before a bracket is seeded.

use crate::auth::AdminCapability;
use crate::error::{BracketError, BracketResult};
use crate::models::{
    BracketMatch, MatchId, Participant, ParticipantId, ParticipantUpdate, Tournament,
    TournamentId, TournamentStatus, TournamentUpdate, SUPPORTED_PARTICIPANT_COUNTS,
};
use crate::store::RecordStore;

pub fn get_tournament<S: RecordStore>(store: &S, id: TournamentId) -> BracketResult<Tournament> {
    store
        .get_by_id::<Tournament>(id)?
        .ok_or(BracketError::TournamentNotFound(id))
}

pub fn update_tournament<S: RecordStore>(
    store: &mut S,
    id: TournamentId,
    update: TournamentUpdate,
) -> BracketResult<Tournament> {
    if store.get_by_id::<Tournament>(id)?.is_none() {
        return Err(BracketError::TournamentNotFound(id));
    }
    Ok(store.update::<Tournament>(id, update)?)
}

/// Participants of a tournament in registration order.
pub fn participants_by_tournament<S: RecordStore>(
    store: &S,
    tournament_id: TournamentId,
) -> BracketResult<Vec<Participant>> {
    Ok(store.find(|p: &Participant| p.tournament_id == tournament_id)?)
}

pub fn get_participant<S: RecordStore>(store: &S, id: ParticipantId) -> BracketResult<Participant> {
    store
        .get_by_id::<Participant>(id)?
        .ok_or(BracketError::ParticipantNotFound(id))
}

/// Mark a participant as knocked out in `round`.
pub fn eliminate_participant<S: RecordStore>(
    store: &mut S,
    id: ParticipantId,
    round: u32,
) -> BracketResult<Participant> {
    if store.get_by_id::<Participant>(id)?.is_none() {
        return Err(BracketError::ParticipantNotFound(id));
    }
    Ok(store.update::<Participant>(id, ParticipantUpdate::eliminated(round))?)
}

pub fn get_match<S: RecordStore>(store: &S, id: MatchId) -> BracketResult<BracketMatch> {
    store
        .get_by_id::<BracketMatch>(id)?
        .ok_or(BracketError::MatchNotFound(id))
}

/// All matches of a tournament ordered by match number.
pub fn matches_by_tournament<S: RecordStore>(
    store: &S,
    tournament_id: TournamentId,
) -> BracketResult<Vec<BracketMatch>> {
    let mut matches = store.find(|m: &BracketMatch| m.tournament_id == tournament_id)?;
    matches.sort_by_key(|m| m.match_number);
    Ok(matches)
}

/// Matches of one round ordered by match number.
pub fn matches_in_round_ordered<S: RecordStore>(
    store: &S,
    tournament_id: TournamentId,
    round: u32,
) -> BracketResult<Vec<BracketMatch>> {
    let mut matches =
        store.find(|m: &BracketMatch| m.tournament_id == tournament_id && m.round == round)?;
    matches.sort_by_key(|m| m.match_number);
    Ok(matches)
}

/// Create a tournament in Draft. Only bracket sizes 4 to 64 are accepted.
pub fn create_tournament<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    name: &str,
    participant_count: u32,
) -> BracketResult<Tournament> {
    if !SUPPORTED_PARTICIPANT_COUNTS.contains(&participant_count) {
        return Err(BracketError::UnsupportedParticipantCount(participant_count));
    }
    let tournament = store.insert(Tournament::new(name.trim(), participant_count))?;
    log::info!(
        "Created tournament {} ({:?}, {} participants)",
        tournament.id,
        tournament.name,
        participant_count
    );
    Ok(tournament)
}

/// Add a participant (Draft or Registration only). Names must be unique (case-insensitive),
/// seeds unique when given, and the roster cannot outgrow the bracket.
pub fn register_participant<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    tournament_id: TournamentId,
    name: &str,
    seed: Option<u32>,
) -> BracketResult<Participant> {
    let tournament = get_tournament(store, tournament_id)?;
    if !matches!(
        tournament.status,
        TournamentStatus::Draft | TournamentStatus::Registration
    ) {
        return Err(BracketError::InvalidState {
            expected: TournamentStatus::Registration,
            actual: tournament.status,
        });
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(BracketError::EmptyParticipantName);
    }
    if seed == Some(0) {
        return Err(BracketError::InvalidSeed);
    }

    let roster = participants_by_tournament(store, tournament_id)?;
    if roster.len() as u32 >= tournament.participant_count {
        return Err(BracketError::RosterFull(tournament.participant_count));
    }
    if roster.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
        return Err(BracketError::DuplicateParticipantName(name.to_string()));
    }
    if let Some(s) = seed {
        if roster.iter().any(|p| p.seed == Some(s)) {
            return Err(BracketError::DuplicateSeed(s));
        }
    }

    Ok(store.insert(Participant::new(tournament_id, name, seed))?)
}

/// Remove a participant before the tournament starts.
pub fn withdraw_participant<S: RecordStore>(
    store: &mut S,
    _admin: &AdminCapability,
    tournament_id: TournamentId,
    participant_id: ParticipantId,
) -> BracketResult<()> {
    let tournament = get_tournament(store, tournament_id)?;
    if !matches!(
        tournament.status,
        TournamentStatus::Draft | TournamentStatus::Registration
    ) {
        return Err(BracketError::InvalidState {
            expected: TournamentStatus::Registration,
            actual: tournament.status,
        });
    }
    let participant = get_participant(store, participant_id)?;
    if participant.tournament_id != tournament_id {
        return Err(BracketError::ParticipantNotFound(participant_id));
    }
    store.delete::<Participant>(participant_id)?;
    Ok(())
}
