//! Property tests over whole rounds (pure domain).
//!
//! Properties tested:
//! - Every card stays accounted for after every operation
//! - Hands stay equal-sized through play and the round always terminates
//! - A serialized mid-round state replays identically

use proptest::prelude::*;

use crate::domain::exchange::end_bottom_phase;
use crate::domain::round::{deal_card, start_round};
use crate::domain::state::{FriendCall, GameState, Phase, PlayResult};
use crate::domain::test_state_helpers::{any_declaration, auto_play, new_game};
use crate::domain::{bidding::end_deal_phase, test_prelude, Card, Settings};

fn total(state: &GameState) -> usize {
    state.settings.total_cards()
}

/// Deal, declare and exchange the bottom, checking conservation as we go.
fn into_play(state: &mut GameState) -> Result<(), TestCaseError> {
    start_round(state).unwrap();
    prop_assert_eq!(state.card_count(), total(state));
    while deal_card(state).unwrap().is_some() {
        prop_assert_eq!(state.card_count(), total(state));
    }
    any_declaration(state);
    let dealt = end_deal_phase(state).unwrap();
    prop_assert_eq!(state.card_count(), total(state));

    let bottom: Vec<Card> = state.player(&dealt.dealer).unwrap().hand[..state.bottom_size as usize].to_vec();
    let calls = (1..state.team_size)
        .map(|_| FriendCall::new(Card::BigJoker, 1))
        .collect();
    end_bottom_phase(state, &dealt.dealer, bottom, calls).unwrap();
    prop_assert_eq!(state.card_count(), total(state));
    Ok(())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: conservation holds through a full round, which ends in Score.
    #[test]
    fn prop_round_conserves_cards(
        settings in crate::domain::test_gens::settings(),
        seed in crate::domain::test_gens::seed(),
    ) {
        let mut state = new_game(settings, seed);
        into_play(&mut state)?;

        let mut plays = 0;
        loop {
            let result = auto_play(&mut state);
            plays += 1;
            prop_assert_eq!(state.card_count(), total(&state));
            if state.current_trick.is_empty() {
                let sizes: Vec<usize> = state.players.iter().map(|p| p.hand.len()).collect();
                prop_assert!(sizes.windows(2).all(|w| w[0] == w[1]), "uneven hands {:?}", sizes);
            }
            if let PlayResult::RoundComplete(round) = result {
                prop_assert_eq!(state.phase, Phase::Score);
                prop_assert!(!round.winners.is_empty());
                break;
            }
            prop_assert!(plays <= total(&state), "round did not terminate");
        }
    }

    /// Property: serde round-trip preserves behavior for the rest of the round.
    #[test]
    fn prop_serialized_state_replays(
        settings in crate::domain::test_gens::settings(),
        seed in crate::domain::test_gens::seed(),
        warmup in 0usize..12,
    ) {
        let mut state = new_game(settings, seed);
        into_play(&mut state)?;
        for _ in 0..warmup {
            if state.phase != Phase::Play {
                break;
            }
            auto_play(&mut state);
        }

        let json = serde_json::to_string(&state).unwrap();
        let mut copy: GameState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&copy, &state);

        while state.phase == Phase::Play {
            let a = auto_play(&mut state);
            let b = auto_play(&mut copy);
            prop_assert_eq!(a, b);
        }
        prop_assert_eq!(copy, state);
    }
}
