use crate::domain::bidding::end_deal_phase;
use crate::domain::game_transition::{derive_round_transitions, RoundTransition};
use crate::domain::round::{deal_card, start_round};
use crate::domain::settings::Settings;
use crate::domain::state::{FriendCall, Phase};
use crate::domain::test_state_helpers::{any_declaration, dealt_game, new_game, pid, play_state, singles};
use crate::domain::tricks::make_play;

#[test]
fn identical_states_produce_nothing() {
    let state = new_game(Settings::default(), 1);
    assert!(derive_round_transitions(&state, &state).is_empty());
}

#[test]
fn start_round_and_dealing() {
    let before = new_game(Settings::default(), 1);
    let mut after = before.clone();
    start_round(&mut after).unwrap();
    assert_eq!(
        derive_round_transitions(&before, &after),
        vec![RoundTransition::PhaseChanged {
            from: Phase::Score,
            to: Phase::Deal
        }]
    );

    let before = after.clone();
    deal_card(&mut after).unwrap();
    assert_eq!(
        derive_round_transitions(&before, &after),
        vec![RoundTransition::TurnBecame {
            player_id: pid("p2")
        }]
    );
}

#[test]
fn declaration_and_end_of_deal() {
    let mut state = dealt_game(Settings::default(), 9);
    let before = state.clone();
    let declarer = any_declaration(&mut state);
    let transitions = derive_round_transitions(&before, &state);
    assert!(matches!(
        transitions.first(),
        Some(RoundTransition::Declared { player_id, amount: 1, .. }) if *player_id == declarer
    ));

    let before = state.clone();
    end_deal_phase(&mut state).unwrap();
    let transitions = derive_round_transitions(&before, &state);
    assert!(transitions.contains(&RoundTransition::PhaseChanged {
        from: Phase::Deal,
        to: Phase::Bottom
    }));
    // The dealer joining the friends is not a reveal.
    assert!(!transitions
        .iter()
        .any(|t| matches!(t, RoundTransition::FriendRevealed { .. })));
}

#[test]
fn reveal_trick_and_round_end() {
    let mut state = play_state(Settings::default(), "2S", &["QD", "KD"]);
    state.friend_calls = vec![FriendCall::new("KD".parse().unwrap(), 1)];
    make_play(&mut state, &pid("p1"), &singles("QD")).unwrap();

    let before = state.clone();
    make_play(&mut state, &pid("p2"), &singles("KD")).unwrap();
    let transitions = derive_round_transitions(&before, &state);

    assert_eq!(
        transitions[..3],
        [
            RoundTransition::FriendRevealed {
                player_id: pid("p2")
            },
            RoundTransition::TrickCompleted { winner: pid("p2") },
            RoundTransition::PhaseChanged {
                from: Phase::Play,
                to: Phase::Score
            },
        ]
    );
    assert!(matches!(transitions[3], RoundTransition::RoundScored { .. }));
    // p2 already held the turn, so no turn edge.
    assert_eq!(transitions.len(), 4);
}

#[test]
fn transitions_serialize_with_type_tag() {
    let t = RoundTransition::TurnBecame {
        player_id: pid("p3"),
    };
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["type"], "turn_became");
    assert_eq!(json["player_id"], "p3");
}
