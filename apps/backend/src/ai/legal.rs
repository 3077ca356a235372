//! Legal-move helpers computed from a seat's own snapshot.

use crate::domain::cards_logic::Trump;
use crate::domain::snapshot::GameSnapshot;
use crate::domain::tricks::legal_follows;
use crate::domain::{Card, Phase};

fn own_rank(view: &GameSnapshot) -> Option<crate::domain::Rank> {
    let viewer = view.viewer.as_ref()?;
    view.seats
        .iter()
        .find(|s| &s.player_id == viewer)
        .map(|s| s.rank)
}

/// Declarations the viewer could make right now, as `(card, amount)`.
///
/// Overturns use every held copy; a reinforcement matches the standing amount.
pub fn legal_declarations(view: &GameSnapshot) -> Vec<(Card, u8)> {
    let (Some(viewer), Some(rank)) = (view.viewer.as_ref(), own_rank(view)) else {
        return Vec::new();
    };
    if view.phase != Phase::Deal {
        return Vec::new();
    }
    if view.settings.winners_declare && !view.winners.contains(viewer) {
        return Vec::new();
    }

    let standing = view.declarations.last();
    let mut out = Vec::new();
    let mut seen: Vec<Card> = Vec::new();
    for card in view.hand.iter().filter(|c| c.rank() == Some(rank)) {
        if seen.contains(card) {
            continue;
        }
        seen.push(*card);
        let held = view.hand.iter().filter(|c| *c == card).count();
        let held = u8::try_from(held).unwrap_or(u8::MAX);
        match standing {
            None => out.push((*card, held)),
            Some(top) if held > top.amount => out.push((*card, held)),
            Some(top) if top.can_reinforce && held >= top.amount => {
                let original = view
                    .declarations
                    .len()
                    .checked_sub(2)
                    .and_then(|i| view.declarations.get(i));
                if original.is_some_and(|o| o.card == *card && &o.player_id == viewer) {
                    out.push((*card, top.amount));
                }
            }
            Some(_) => {}
        }
    }
    out
}

/// Plays the viewer may submit: leading singles and pairs, or follow options.
pub fn legal_plays(view: &GameSnapshot) -> Vec<Vec<Vec<Card>>> {
    if view.phase != Phase::Play {
        return Vec::new();
    }
    let Some(trump) = view.declared.and_then(Trump::from_declared) else {
        return Vec::new();
    };
    match view.current_trick.first() {
        Some(lead) => legal_follows(&view.hand, &lead.units, trump, view.settings.wraparound)
            .into_iter()
            .map(|cards| cards.into_iter().map(|c| vec![c]).collect())
            .collect(),
        None => {
            let mut leads: Vec<Vec<Vec<Card>>> = Vec::new();
            for (i, card) in view.hand.iter().enumerate() {
                if view.hand[..i].contains(card) {
                    if !leads.iter().any(|l| l[0] == vec![*card, *card]) {
                        leads.push(vec![vec![*card, *card]]);
                    }
                } else {
                    leads.push(vec![vec![*card]]);
                }
            }
            leads
        }
    }
}
