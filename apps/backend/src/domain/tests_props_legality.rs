//! Property-based tests for suit-following legality.
//!
//! Properties tested:
//! - Every offered follow option is accepted by `make_play`
//! - An accepted follow carries `min(suited held, trick size)` suited cards
//! - Cards the player does not hold are always rejected with `CardNotInHand`

use proptest::prelude::*;

use crate::domain::cards_logic::{effective_suit, suited_cards};
use crate::domain::state::{GameState, Phase};
use crate::domain::test_state_helpers::{auto_play, dealt_game};
use crate::domain::tricks::{follow_options, make_play};
use crate::domain::{bidding::end_deal_phase, test_gens, test_prelude, Card, Settings, Trump};
use crate::domain::{combos::common_suit, exchange::end_bottom_phase, state::FriendCall};
use crate::errors::domain::ValidationKind;

/// A two-deck round just moved into `Play`.
fn play_game(seed: u64, wraparound: bool) -> GameState {
    let settings = Settings {
        num_decks: 2,
        wraparound,
        ..Settings::default()
    };
    let mut state = dealt_game(settings, seed);
    crate::domain::test_state_helpers::any_declaration(&mut state);
    let dealer = end_deal_phase(&mut state).unwrap().dealer;
    let bottom = state.player(&dealer).unwrap().hand[..state.bottom_size as usize].to_vec();
    end_bottom_phase(&mut state, &dealer, bottom, vec![FriendCall::new(Card::BigJoker, 1)])
        .unwrap();
    state
}

fn singles(cards: &[Card]) -> Vec<Vec<Card>> {
    cards.iter().map(|c| vec![*c]).collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: offered options are legal and suited as far as the hand allows.
    #[test]
    fn prop_follow_options_are_accepted(
        seed in test_gens::seed(),
        wraparound in any::<bool>(),
        lead_len in 1usize..=2,
        warmup_tricks in 0usize..4,
    ) {
        let mut state = play_game(seed, wraparound);
        for _ in 0..warmup_tricks * state.players.len() {
            auto_play(&mut state);
        }
        prop_assume!(state.phase == Phase::Play && state.current_trick.is_empty());

        // Lead a pair when the leader has one, else a single.
        let trump: Trump = state.trump().unwrap();
        let leader = state.current_turn.clone();
        let hand = state.player(&leader).unwrap().hand.clone();
        let pair = hand.windows(2).find(|w| w[0] == w[1]).map(|w| w.to_vec());
        let lead = match (lead_len, pair) {
            (2, Some(pair)) => pair,
            _ => vec![hand[0]],
        };
        make_play(&mut state, &leader, &[lead.clone()]).unwrap();
        let suit = effective_suit(lead[0], trump);

        let follower = state.current_turn.clone();
        let options = follow_options(&state, &follower).unwrap();
        prop_assert!(!options.is_empty());
        let held = suited_cards(&state.player(&follower).unwrap().hand, suit, trump).len();

        for option in options {
            prop_assert_eq!(option.len(), lead.len());
            let suited = option.iter().filter(|c| effective_suit(**c, trump) == suit).count();
            prop_assert_eq!(suited, held.min(lead.len()));

            let mut copy = state.clone();
            let result = make_play(&mut copy, &follower, &singles(&option));
            prop_assert!(result.is_ok(), "option {:?} rejected: {:?}", option, result);
        }
    }

    /// Property: a single-card play of a card the player lacks never goes through.
    #[test]
    fn prop_unheld_card_is_rejected(
        seed in test_gens::seed(),
        card in test_gens::card(),
    ) {
        let mut state = play_game(seed, false);
        let leader = state.current_turn.clone();
        prop_assume!(state.player(&leader).unwrap().copies_of(card) == 0);

        let before = state.clone();
        let err = make_play(&mut state, &leader, &[vec![card]]).unwrap_err();
        prop_assert_eq!(err.validation_kind(), Some(&ValidationKind::CardNotInHand));
        prop_assert_eq!(state, before);
    }

    /// Property: a complete trick's lead units always share one suit.
    #[test]
    fn prop_last_trick_lead_is_suited(seed in test_gens::seed()) {
        let mut state = play_game(seed, false);
        let n = state.players.len();
        for _ in 0..n {
            auto_play(&mut state);
        }
        prop_assert_eq!(state.last_trick.len(), n);
        prop_assert!(common_suit(&state.last_trick[0].units).is_some());
    }
}
