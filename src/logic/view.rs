//! Read-only bracket views with participant records resolved (for API / display).

use crate::error::{BracketError, BracketResult};
use crate::logic::directory::{
    get_match, get_tournament, matches_by_tournament, participants_by_tournament,
};
use crate::logic::finalization::get_standings;
use crate::logic::topology::round_name;
use crate::models::{
    BracketMatch, MatchId, MatchStatus, Participant, ParticipantId, Standings, Tournament,
    TournamentId, TournamentStatus,
};
use crate::store::RecordStore;
use serde::Serialize;
use std::collections::HashMap;

/// A match with its participants resolved.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: u32,
    pub round_name: String,
    pub match_number: u32,
    pub participant1: Option<Participant>,
    pub participant2: Option<Participant>,
    pub winner: Option<Participant>,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub status: MatchStatus,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundView {
    pub round: u32,
    pub name: String,
    pub is_current: bool,
    pub matches: Vec<MatchView>,
}

/// Whole bracket grouped by round, plus the champion once there is one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketView {
    pub tournament: Tournament,
    pub rounds: Vec<RoundView>,
    pub champion: Option<Participant>,
    pub standings: Option<Standings>,
}

type Roster = HashMap<ParticipantId, Participant>;

fn resolve(roster: &Roster, id: Option<ParticipantId>) -> BracketResult<Option<Participant>> {
    match id {
        None => Ok(None),
        Some(id) => roster
            .get(&id)
            .cloned()
            .map(Some)
            .ok_or(BracketError::ParticipantNotFound(id)),
    }
}

fn match_view(m: &BracketMatch, total_rounds: u32, roster: &Roster) -> BracketResult<MatchView> {
    Ok(MatchView {
        id: m.id,
        round: m.round,
        round_name: round_name(m.round, total_rounds),
        match_number: m.match_number,
        participant1: resolve(roster, m.participant1_id)?,
        participant2: resolve(roster, m.participant2_id)?,
        winner: resolve(roster, m.winner_id)?,
        score1: m.score1,
        score2: m.score2,
        status: m.status,
    })
}

fn roster_of<S: RecordStore>(store: &S, tournament_id: TournamentId) -> BracketResult<Roster> {
    Ok(participants_by_tournament(store, tournament_id)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

/// Bracket grouped by round in match-number order. Empty `rounds` before generation.
pub fn get_bracket_view<S: RecordStore>(
    store: &S,
    tournament_id: TournamentId,
) -> BracketResult<BracketView> {
    let tournament = get_tournament(store, tournament_id)?;
    let roster = roster_of(store, tournament_id)?;
    let matches = matches_by_tournament(store, tournament_id)?;

    let mut rounds: Vec<RoundView> = Vec::with_capacity(tournament.total_rounds as usize);
    for m in &matches {
        let view = match_view(m, tournament.total_rounds, &roster)?;
        match rounds.last_mut() {
            Some(r) if r.round == m.round => r.matches.push(view),
            _ => rounds.push(RoundView {
                round: m.round,
                name: round_name(m.round, tournament.total_rounds),
                is_current: tournament.status == TournamentStatus::Ongoing
                    && tournament.current_round == m.round,
                matches: vec![view],
            }),
        }
    }

    let standings = get_standings(store, tournament_id)?;
    let champion = match &standings {
        Some(s) => resolve(&roster, Some(s.champion_id))?,
        None => None,
    };

    Ok(BracketView {
        tournament,
        rounds,
        champion,
        standings,
    })
}

/// A single match with participants and round name resolved.
pub fn get_match_view<S: RecordStore>(store: &S, match_id: MatchId) -> BracketResult<MatchView> {
    let m = get_match(store, match_id)?;
    let tournament = get_tournament(store, m.tournament_id)?;
    let roster = roster_of(store, m.tournament_id)?;
    match_view(&m, tournament.total_rounds, &roster)
}
