//! Integration tests for the bracket lifecycle: generate, seed, score, finalize, reset.

use bracket_tournament_web::logic::{matches_by_tournament, matches_in_round_ordered};
use bracket_tournament_web::{
    assign_participants, create_tournament, generate_bracket, get_bracket_view, get_match_view,
    get_standings, mark_live, register_participant, reset_bracket, update_score,
    withdraw_participant, AdminCapability, AdminKey, BracketError, BracketMatch, MatchStatus,
    MemoryStore,
    Participant, ParticipantStatus, RecordStore, Standings, Tournament, TournamentId,
    TournamentStatus,
};

fn admin() -> AdminCapability {
    AdminKey::new("test").authorize("test").unwrap()
}

/// Tournament of `n` with participants registered in reverse seed order.
fn tournament_with_roster(n: u32) -> (MemoryStore, TournamentId, Vec<Participant>) {
    let mut store = MemoryStore::new();
    let admin = admin();
    let t = create_tournament(&mut store, &admin, "Club Open", n).unwrap();
    let mut by_seed = Vec::new();
    for seed in (1..=n).rev() {
        let p = register_participant(&mut store, &admin, t.id, &format!("Seed {seed}"), Some(seed))
            .unwrap();
        by_seed.push(p);
    }
    by_seed.reverse();
    (store, t.id, by_seed)
}

fn tournament(store: &MemoryStore, id: TournamentId) -> Tournament {
    store.get_by_id(id).unwrap().unwrap()
}

fn participant(store: &MemoryStore, p: &Participant) -> Participant {
    store.get_by_id(p.id).unwrap().unwrap()
}

#[test]
fn four_player_tournament_end_to_end() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(4);

    let matches = generate_bracket(&mut store, &admin, tid).unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches.iter().filter(|m| m.round == 1).count(), 2);
    assert_eq!(matches.iter().filter(|m| m.round == 2).count(), 1);
    assert!(matches.iter().all(|m| m.status == MatchStatus::Pending));
    assert_eq!(tournament(&store, tid).status, TournamentStatus::Registration);
    assert_eq!(tournament(&store, tid).total_rounds, 2);

    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    let (a, b) = (&round_one[0], &round_one[1]);
    assert_eq!(a.participant1_id, Some(seeds[0].id));
    assert_eq!(a.participant2_id, Some(seeds[3].id));
    assert_eq!(b.participant1_id, Some(seeds[1].id));
    assert_eq!(b.participant2_id, Some(seeds[2].id));
    assert!(round_one.iter().all(|m| m.status == MatchStatus::Upcoming));
    let t = tournament(&store, tid);
    assert_eq!(t.status, TournamentStatus::Ongoing);
    assert!(t.start_date.is_some());

    // Seed 1 beats seed 4.
    let report = update_score(&mut store, &admin, a.id, 3, 1).unwrap();
    assert_eq!(report.completed.status, MatchStatus::Completed);
    assert_eq!(report.completed.winner_id, Some(seeds[0].id));
    assert_eq!(report.eliminated.id, seeds[3].id);
    assert_eq!(participant(&store, &seeds[3]).eliminated_at_round, Some(1));
    let final_match = report.advanced_to.unwrap();
    assert_eq!(final_match.participant1_id, Some(seeds[0].id));
    assert_eq!(final_match.participant2_id, None);
    assert_eq!(final_match.status, MatchStatus::Pending);
    assert_eq!(report.current_round, 1);

    // Seed 3 upsets seed 2.
    let report = update_score(&mut store, &admin, b.id, 0, 2).unwrap();
    assert_eq!(report.eliminated.id, seeds[1].id);
    let final_match = report.advanced_to.unwrap();
    assert_eq!(final_match.participant2_id, Some(seeds[2].id));
    assert_eq!(final_match.status, MatchStatus::Upcoming);
    assert_eq!(report.current_round, 2);
    assert_eq!(tournament(&store, tid).current_round, 2);

    // Final: seed 1 beats seed 3.
    let report = update_score(&mut store, &admin, final_match.id, 2, 1).unwrap();
    assert!(report.advanced_to.is_none());
    assert_eq!(participant(&store, &seeds[2]).eliminated_at_round, Some(2));
    let standings = report.standings.unwrap();
    assert_eq!(standings.champion_id, seeds[0].id);
    assert_eq!(standings.runner_up_id, seeds[2].id);
    assert_eq!(standings.third_place_ids, vec![seeds[3].id, seeds[1].id]);
    assert_eq!(standings.total_matches, 3);
    assert_eq!(standings.total_participants, 4);

    let t = tournament(&store, tid);
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.current_round, 2);
    assert!(t.end_date.is_some());
    assert_eq!(participant(&store, &seeds[0]).status, ParticipantStatus::Active);
}

#[test]
fn draw_is_rejected_and_leaves_match_untouched() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();

    let err = update_score(&mut store, &admin, round_one[0].id, 2, 2).unwrap_err();
    assert!(matches!(err, BracketError::DrawNotAllowed));
    let view = get_match_view(&store, round_one[0].id).unwrap();
    assert_eq!(view.status, MatchStatus::Upcoming);
    assert!(view.winner.is_none());
}

#[test]
fn negative_score_is_rejected() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();

    let err = update_score(&mut store, &admin, round_one[0].id, -1, 3).unwrap_err();
    assert!(matches!(
        err,
        BracketError::InvalidScore {
            score1: -1,
            score2: 3
        }
    ));
}

#[test]
fn score_above_u32_range_is_rejected() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();

    let too_big = i64::from(u32::MAX) + 1;
    let err = update_score(&mut store, &admin, round_one[0].id, too_big, 0).unwrap_err();
    assert!(matches!(err, BracketError::InvalidScore { .. }));
    assert!(err.to_string().contains("between 0 and 4294967295"));
}

#[test]
fn upcoming_match_with_empty_slot_is_incomplete() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(4);
    let mut half_filled = BracketMatch::placeholder(tid, 1, 1);
    half_filled.participant1_id = Some(seeds[0].id);
    half_filled.status = MatchStatus::Upcoming;
    let half_filled = store.insert(half_filled).unwrap();

    let err = update_score(&mut store, &admin, half_filled.id, 2, 1).unwrap_err();
    assert!(matches!(err, BracketError::IncompleteMatch(id) if id == half_filled.id));
    assert!(!err.is_internal());
}

#[test]
fn missing_destination_is_corruption_and_writes_nothing() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    let removed = store
        .delete_where(|m: &BracketMatch| m.tournament_id == tid && m.round == 2)
        .unwrap();
    assert_eq!(removed, 1);

    let err = update_score(&mut store, &admin, round_one[0].id, 3, 1).unwrap_err();
    assert!(matches!(err, BracketError::BracketCorruption(_)));
    assert!(err.is_internal());
    assert_eq!(err.client_message(), "Internal server error");

    let untouched = get_match_view(&store, round_one[0].id).unwrap();
    assert_eq!(untouched.status, MatchStatus::Upcoming);
    assert!(untouched.winner.is_none());
    assert_eq!(participant(&store, &seeds[0]).status, ParticipantStatus::Active);
    assert_eq!(participant(&store, &seeds[3]).status, ParticipantStatus::Active);
    assert_eq!(participant(&store, &seeds[3]).eliminated_at_round, None);

    // Still the same error on retry, not MatchAlreadyCompleted.
    let err = update_score(&mut store, &admin, round_one[0].id, 3, 1).unwrap_err();
    assert!(matches!(err, BracketError::BracketCorruption(_)));
}

#[test]
fn assign_detects_missing_first_round_match() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    store
        .delete_where(|m: &BracketMatch| m.tournament_id == tid && m.match_number == 1)
        .unwrap();

    let err = assign_participants(&mut store, &admin, tid).unwrap_err();
    assert!(matches!(err, BracketError::BracketCorruption(_)));
    assert!(err.is_internal());
    assert_eq!(tournament(&store, tid).status, TournamentStatus::Registration);
}

#[test]
fn pending_match_cannot_be_scored() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    assign_participants(&mut store, &admin, tid).unwrap();
    let final_match = &matches_in_round_ordered(&store, tid, 2).unwrap()[0];

    let err = update_score(&mut store, &admin, final_match.id, 1, 0).unwrap_err();
    assert!(matches!(err, BracketError::MatchNotReady(id) if id == final_match.id));
}

#[test]
fn completed_match_cannot_be_rescored() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    update_score(&mut store, &admin, round_one[0].id, 3, 0).unwrap();

    let err = update_score(&mut store, &admin, round_one[0].id, 0, 3).unwrap_err();
    assert!(matches!(err, BracketError::MatchAlreadyCompleted(_)));
    assert_eq!(participant(&store, &seeds[0]).status, ParticipantStatus::Active);
}

#[test]
fn final_cannot_produce_second_standings() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    update_score(&mut store, &admin, round_one[0].id, 1, 0).unwrap();
    let final_match = update_score(&mut store, &admin, round_one[1].id, 1, 0)
        .unwrap()
        .advanced_to
        .unwrap();
    update_score(&mut store, &admin, final_match.id, 5, 4).unwrap();

    assert!(update_score(&mut store, &admin, final_match.id, 5, 4).is_err());
    let all: Vec<Standings> = store.find(|s: &Standings| s.tournament_id == tid).unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn generate_twice_fails_already_generated() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(8);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let err = generate_bracket(&mut store, &admin, tid).unwrap_err();
    assert!(matches!(
        err,
        BracketError::AlreadyGenerated(TournamentStatus::Registration)
    ));
    assert_eq!(matches_by_tournament(&store, tid).unwrap().len(), 7);
}

#[test]
fn assign_requires_full_roster() {
    let admin = admin();
    let mut store = MemoryStore::new();
    let t = create_tournament(&mut store, &admin, "Half Full", 8).unwrap();
    for i in 0..5 {
        register_participant(&mut store, &admin, t.id, &format!("P{i}"), None).unwrap();
    }
    generate_bracket(&mut store, &admin, t.id).unwrap();
    let err = assign_participants(&mut store, &admin, t.id).unwrap_err();
    assert!(matches!(
        err,
        BracketError::IncompleteRoster {
            expected: 8,
            actual: 5
        }
    ));
}

#[test]
fn assign_requires_generated_bracket() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    let err = assign_participants(&mut store, &admin, tid).unwrap_err();
    assert!(matches!(
        err,
        BracketError::InvalidState {
            expected: TournamentStatus::Registration,
            actual: TournamentStatus::Draft
        }
    ));
}

#[test]
fn unseeded_participants_fill_the_bottom_in_registration_order() {
    let admin = admin();
    let mut store = MemoryStore::new();
    let t = create_tournament(&mut store, &admin, "Walk-ins", 4).unwrap();
    let late = register_participant(&mut store, &admin, t.id, "Late", None).unwrap();
    let top = register_participant(&mut store, &admin, t.id, "Top", Some(1)).unwrap();
    let later = register_participant(&mut store, &admin, t.id, "Later", None).unwrap();
    let second = register_participant(&mut store, &admin, t.id, "Second", Some(2)).unwrap();
    generate_bracket(&mut store, &admin, t.id).unwrap();
    let round_one = assign_participants(&mut store, &admin, t.id).unwrap();

    // Order: Top, Second, Late, Later -> (Top vs Later), (Second vs Late).
    assert_eq!(round_one[0].participant1_id, Some(top.id));
    assert_eq!(round_one[0].participant2_id, Some(later.id));
    assert_eq!(round_one[1].participant1_id, Some(second.id));
    assert_eq!(round_one[1].participant2_id, Some(late.id));
}

#[test]
fn mark_live_only_from_upcoming() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();

    let live = mark_live(&mut store, &admin, round_one[0].id).unwrap();
    assert_eq!(live.status, MatchStatus::Live);
    assert!(matches!(
        mark_live(&mut store, &admin, round_one[0].id),
        Err(BracketError::InvalidMatchState {
            status: MatchStatus::Live,
            ..
        })
    ));

    // Live matches can still be scored.
    let report = update_score(&mut store, &admin, round_one[0].id, 4, 2).unwrap();
    assert_eq!(report.completed.status, MatchStatus::Completed);
}

#[test]
fn reset_restores_draft_and_reactivates_everyone() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    update_score(&mut store, &admin, round_one[0].id, 3, 1).unwrap();

    let t = reset_bracket(&mut store, &admin, tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Draft);
    assert_eq!(t.current_round, 1);
    assert!(t.start_date.is_none());
    assert!(matches_by_tournament(&store, tid).unwrap().is_empty());
    let loser = participant(&store, &seeds[3]);
    assert_eq!(loser.status, ParticipantStatus::Active);
    assert_eq!(loser.eliminated_at_round, None);

    // The bracket can be generated again.
    assert_eq!(generate_bracket(&mut store, &admin, tid).unwrap().len(), 3);
}

#[test]
fn reset_of_completed_tournament_is_rejected() {
    let admin = admin();
    let (mut store, tid, _) = tournament_with_roster(4);
    generate_bracket(&mut store, &admin, tid).unwrap();
    let round_one = assign_participants(&mut store, &admin, tid).unwrap();
    update_score(&mut store, &admin, round_one[0].id, 1, 0).unwrap();
    let final_match = update_score(&mut store, &admin, round_one[1].id, 1, 0)
        .unwrap()
        .advanced_to
        .unwrap();
    update_score(&mut store, &admin, final_match.id, 0, 1).unwrap();

    assert!(matches!(
        reset_bracket(&mut store, &admin, tid),
        Err(BracketError::CannotResetCompleted)
    ));
    assert!(get_standings(&store, tid).unwrap().is_some());
}

#[test]
fn bracket_view_groups_rounds_and_names_them() {
    let admin = admin();
    let (mut store, tid, seeds) = tournament_with_roster(8);
    generate_bracket(&mut store, &admin, tid).unwrap();
    assign_participants(&mut store, &admin, tid).unwrap();

    let view = get_bracket_view(&store, tid).unwrap();
    let names: Vec<_> = view.rounds.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Quarterfinal", "Semifinal", "Final"]);
    assert_eq!(
        view.rounds.iter().map(|r| r.matches.len()).collect::<Vec<_>>(),
        vec![4, 2, 1]
    );
    assert!(view.rounds[0].is_current);
    assert!(!view.rounds[1].is_current);
    assert_eq!(
        view.rounds[0].matches[0].participant1.as_ref().map(|p| p.id),
        Some(seeds[0].id)
    );
    assert!(view.champion.is_none());

    assert_eq!(view, get_bracket_view(&store, tid).unwrap());
}

#[test]
fn missing_records_report_not_found() {
    let admin = admin();
    let mut store = MemoryStore::new();
    let err = generate_bracket(&mut store, &admin, uuid::Uuid::new_v4()).unwrap_err();
    assert!(err.is_not_found());
    let err = update_score(&mut store, &admin, uuid::Uuid::new_v4(), 1, 0).unwrap_err();
    assert!(matches!(err, BracketError::MatchNotFound(_)));
}

#[test]
fn roster_rules_are_enforced() {
    let admin = admin();
    let mut store = MemoryStore::new();
    assert!(matches!(
        create_tournament(&mut store, &admin, "Odd", 6),
        Err(BracketError::UnsupportedParticipantCount(6))
    ));
    let t = create_tournament(&mut store, &admin, "Small", 4).unwrap();
    let ada = register_participant(&mut store, &admin, t.id, "Ada", Some(1)).unwrap();
    assert!(matches!(
        register_participant(&mut store, &admin, t.id, " ada ", None),
        Err(BracketError::DuplicateParticipantName(_))
    ));
    assert!(matches!(
        register_participant(&mut store, &admin, t.id, "Bo", Some(1)),
        Err(BracketError::DuplicateSeed(1))
    ));
    assert!(matches!(
        register_participant(&mut store, &admin, t.id, "   ", None),
        Err(BracketError::EmptyParticipantName)
    ));
    for name in ["Bo", "Cy", "Di"] {
        register_participant(&mut store, &admin, t.id, name, None).unwrap();
    }
    assert!(matches!(
        register_participant(&mut store, &admin, t.id, "Ed", None),
        Err(BracketError::RosterFull(4))
    ));

    withdraw_participant(&mut store, &admin, t.id, ada.id).unwrap();
    register_participant(&mut store, &admin, t.id, "Ed", Some(1)).unwrap();
}
