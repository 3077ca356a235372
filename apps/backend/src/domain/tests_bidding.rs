use std::cmp::Ordering;

use crate::domain::bidding::{declare, end_deal_phase};
use crate::domain::cards_logic::compare_cards;
use crate::domain::round::start_round;
use crate::domain::settings::Settings;
use crate::domain::state::{GameState, Phase};
use crate::domain::test_state_helpers::{cards, dealt_game, new_game, pid};
use crate::domain::{Card, Rank};
use crate::errors::domain::ValidationKind;

/// Deal-phase state with fixed hands, every player at `rank`, dealing done.
fn deal_phase(decks: u8, rank: Rank, hands: &[&str]) -> GameState {
    let settings = Settings {
        num_decks: decks,
        num_players: hands.len() as u8,
        ..Settings::default()
    };
    let mut state = new_game(settings, 3);
    start_round(&mut state).unwrap();
    let bottom = state.bottom_size as usize;
    state.deck.truncate(bottom);
    for (p, hand) in state.players.iter_mut().zip(hands) {
        p.hand = cards(hand);
        p.rank = rank;
    }
    state
}

fn c(s: &str) -> Card {
    s.parse().unwrap()
}

fn kind_of(err: crate::errors::domain::DomainError) -> ValidationKind {
    err.validation_kind().cloned().unwrap()
}

#[test]
fn declaration_preconditions() {
    let mut state = deal_phase(1, Rank::Four, &["4S 9H", "4H 5D", "3C 3D", "AS KS"]);

    // off rank
    let err = declare(&mut state, &pid("p1"), c("9H"), 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    // jokers are never declarable
    state.players[0].hand.push(Card::BigJoker);
    let err = declare(&mut state, &pid("p1"), Card::BigJoker, 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    // more copies than held
    let err = declare(&mut state, &pid("p1"), c("4S"), 2).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InsufficientCards);
    // unknown player
    assert!(declare(&mut state, &pid("nobody"), c("4S"), 1).is_err());

    assert!(state.declarations.is_empty());
    let d = declare(&mut state, &pid("p1"), c("4S"), 1).unwrap();
    assert_eq!(d.player_id, pid("p1"));
    assert!(!d.reinforce_eligible);
}

#[test]
fn overturn_needs_more_cards() {
    let mut state = deal_phase(1, Rank::Four, &["4S", "4H", "4D", "AS"]);
    declare(&mut state, &pid("p1"), c("4S"), 1).unwrap();
    let before = state.clone();
    let err = declare(&mut state, &pid("p2"), c("4H"), 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    assert_eq!(state, before);
}

#[test]
fn overturned_declarer_may_not_redeclare_without_eligibility() {
    // P1 holds one 4S, so after P2's pair P1 cannot contest.
    let mut state = deal_phase(3, Rank::Four, &["4S 9C", "4S 4S", "3C 3D", "AS KS"]);
    declare(&mut state, &pid("p1"), c("4S"), 1).unwrap();
    let d = declare(&mut state, &pid("p2"), c("4S"), 2).unwrap();
    assert!(!d.reinforce_eligible);
    assert_eq!(d.prev_player, None);

    let err = declare(&mut state, &pid("p1"), c("4S"), 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    assert_eq!(state.declarations.len(), 2);
}

#[test]
fn reinforcement_only_by_the_overturned_player() {
    let mut state = deal_phase(2, Rank::Four, &["4S 4S", "4H 4H", "4D 4D", "AS KS"]);
    declare(&mut state, &pid("p1"), c("4S"), 1).unwrap();
    let d = declare(&mut state, &pid("p2"), c("4H"), 2).unwrap();
    assert!(d.reinforce_eligible);
    assert_eq!(d.prev_player, Some(pid("p1")));

    // Someone else at the same amount is not a reinforcement.
    let err = declare(&mut state, &pid("p3"), c("4D"), 2).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    // The eligible player must use their original card.
    state.players[0].hand.extend(cards("4C 4C"));
    let err = declare(&mut state, &pid("p1"), c("4C"), 2).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);

    let r = declare(&mut state, &pid("p1"), c("4S"), 2).unwrap();
    assert!(!r.reinforce_eligible);

    // The reinforcement closes the exception: matching it again is illegal.
    let err = declare(&mut state, &pid("p2"), c("4H"), 2).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    assert_eq!(state.declarations.len(), 3);
}

#[test]
fn winners_declare_restricts_bidders() {
    let mut state = deal_phase(1, Rank::Four, &["4S", "4H", "4D", "AS"]);
    state.settings.winners_declare = true;
    state.winners = [pid("p2")].into_iter().collect();

    let err = declare(&mut state, &pid("p1"), c("4S"), 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    declare(&mut state, &pid("p2"), c("4H"), 1).unwrap();
}

#[test]
fn declare_outside_deal_phase() {
    let mut state = new_game(Settings::default(), 1);
    let err = declare(&mut state, &pid("p1"), c("2S"), 1).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::WrongPhase);
}

#[test]
fn end_deal_requires_complete_deal_and_a_declaration() {
    let mut state = new_game(Settings::default(), 5);
    start_round(&mut state).unwrap();
    let err = end_deal_phase(&mut state).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::DealingInProgress);

    let mut state = dealt_game(Settings::default(), 5);
    let err = end_deal_phase(&mut state).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::IllegalDeclaration);
    assert_eq!(state.phase, Phase::Deal);
}

#[test]
fn end_deal_hands_bottom_to_declarer() {
    let mut state = deal_phase(1, Rank::Four, &["4S 9H", "4H 5D", "3C 3D", "AS KS"]);
    let bottom_before = state.deck.clone();
    declare(&mut state, &pid("p1"), c("4S"), 1).unwrap();
    state.players[1].hand.push(c("4H"));
    declare(&mut state, &pid("p2"), c("4H"), 2).unwrap();

    let result = end_deal_phase(&mut state).unwrap();
    assert_eq!(result.dealer, pid("p2"));
    assert_eq!(result.bottom, bottom_before);
    assert_eq!(state.phase, Phase::Bottom);
    assert_eq!(state.current_turn, pid("p2"));
    assert_eq!(state.declared, Some(c("4H")));
    assert!(state.deck.is_empty());
    assert_eq!(state.friends.iter().collect::<Vec<_>>(), vec![&pid("p2")]);
    assert_eq!(state.players[1].hand.len(), 3 + bottom_before.len());
    let trump = state.trump().unwrap();
    for p in &state.players {
        assert!(p
            .hand
            .windows(2)
            .all(|w| compare_cards(w[0], w[1], trump) != Ordering::Greater));
    }
}
