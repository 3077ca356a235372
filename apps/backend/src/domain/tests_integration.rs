//! Whole-game flows driven through the public domain operations.

use crate::domain::bidding::end_deal_phase;
use crate::domain::exchange::end_bottom_phase;
use crate::domain::round::{add_player, deal_all, remove_player, reset, start_round, update_settings};
use crate::domain::seed_derivation::derive_next_game_seed;
use crate::domain::settings::{Settings, SettingsUpdate};
use crate::domain::state::{FriendCall, GameState, Phase, PlayResult, RoundResult};
use crate::domain::test_state_helpers::{any_declaration, auto_play, new_game, pid};
use crate::domain::{Card, PlayerProfile, Rank};
use crate::errors::domain::{ConflictKind, DomainError};

fn play_round(state: &mut GameState) -> RoundResult {
    start_round(state).unwrap();
    deal_all(state).unwrap();
    any_declaration(state);
    let dealer = end_deal_phase(state).unwrap().dealer;
    let bottom = state.player(&dealer).unwrap().hand[..state.bottom_size as usize].to_vec();
    let calls = (1..state.team_size)
        .map(|_| FriendCall::new(Card::BigJoker, 1))
        .collect();
    end_bottom_phase(state, &dealer, bottom, calls).unwrap();

    loop {
        if let PlayResult::RoundComplete(result) = auto_play(state) {
            return result;
        }
    }
}

#[test]
fn several_rounds_progress_ranks() {
    let mut state = new_game(Settings::default(), 2024);
    let mut prev_ranks: Vec<Rank> = state.players.iter().map(|p| p.rank).collect();

    for round in 1..=4u32 {
        let result = play_round(&mut state);
        assert_eq!(state.round_no, round);
        assert_eq!(state.phase, Phase::Score);
        assert_eq!(state.last_round.as_ref(), Some(&result));
        assert_eq!(state.winners.len(), result.winners.len());
        assert!(result.winners.iter().all(|w| state.winners.contains(w)));

        let ranks: Vec<Rank> = state.players.iter().map(|p| p.rank).collect();
        for (p, (before, after)) in state.players.iter().zip(prev_ranks.iter().zip(&ranks)) {
            if result.winners.contains(&p.id) {
                assert!(after >= before);
            } else {
                assert_eq!(after, before);
            }
        }
        prev_ranks = ranks;
        assert_eq!(state.card_count(), 54);
    }
}

#[test]
fn reset_returns_to_a_fresh_game() {
    let mut state = new_game(Settings::default(), 5);
    play_round(&mut state);
    reset(&mut state).unwrap();

    assert_eq!(state, new_game(Settings::default(), derive_next_game_seed(5)));
    assert!(state.players.iter().all(|p| p.rank == Rank::Two));
    assert_eq!(state.winners.len(), 4);
}

#[test]
fn table_changes_between_rounds() {
    let mut state = new_game(Settings::default(), 17);
    start_round(&mut state).unwrap();
    let profile = PlayerProfile {
        name: "Late".into(),
        avatar_uri: None,
    };
    let err = add_player(&mut state, pid("p5"), profile.clone()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RoundInProgress, _)
    ));

    let mut state = new_game(Settings::default(), 17);
    play_round(&mut state);
    add_player(&mut state, pid("p5"), profile).unwrap();
    remove_player(&mut state, &pid("p2")).unwrap();
    update_settings(
        &mut state,
        SettingsUpdate {
            num_decks: Some(2),
            ..SettingsUpdate::default()
        },
    )
    .unwrap();

    let seats: Vec<usize> = state.players.iter().map(|p| p.seat).collect();
    assert_eq!(seats, vec![0, 1, 2, 3]);
    // Late joiners do not become winners after the first round.
    assert!(!state.winners.contains(&pid("p5")));

    let result = play_round(&mut state);
    assert!(!result.winners.is_empty());
    assert_eq!(state.card_count(), 108);
}
