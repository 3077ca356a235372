use tracing::{debug, info};

use crate::domain::cards_logic::{point_value, suited_cards, Trump};
use crate::domain::cards_types::Card;
use crate::domain::combos::{all_cards, beats, common_suit, sort_units_desc, total_size, Unit};
use crate::domain::matcher::{matches_possibility, Matcher};
use crate::domain::player::PlayerId;
use crate::domain::scoring::calculate_score;
use crate::domain::state::{
    require_phase, require_trump, require_turn, GameState, Phase, PlayResult, TrickPlay,
    TrickResult,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Build units from submitted card groups under the round's trump.
pub fn parse_play(state: &GameState, groups: &[Vec<Card>]) -> Result<Vec<Unit>, DomainError> {
    let trump = require_trump(state, "parse_play")?;
    if groups.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::IllegalPlayShape,
            "A play needs at least one unit",
        ));
    }
    groups
        .iter()
        .map(|g| Unit::from_cards(g, trump, state.settings.wraparound))
        .collect()
}

/// All units of a throw must share one trump-relative suit.
pub fn check_throw_suited(units: &[Unit]) -> bool {
    common_suit(units).is_some()
}

/// Find the first unit of a throw (strongest first) that some opponent,
/// scanning clockwise from the thrower, could beat on its own.
pub fn check_throw_valid(
    state: &GameState,
    thrower: &PlayerId,
    units: &[Unit],
    trump: Trump,
) -> Result<Option<Unit>, DomainError> {
    let seat = state.seat_of(thrower)?;
    let n = state.players.len();
    for unit in units {
        for offset in 1..n {
            let opponent = state.player_at_offset(seat, offset);
            let suited = suited_cards(&opponent.hand, unit.suit(), trump);
            let matcher = Matcher::from_hand(
                &suited,
                std::slice::from_ref(unit),
                trump,
                state.settings.wraparound,
            );
            if matcher.beats_trick() {
                debug!(thrower = %thrower, opponent = %opponent.id, "Throw is beatable");
                return Ok(Some(unit.clone()));
            }
        }
    }
    Ok(None)
}

/// Suit-following check of `units` from `who` against the led entry.
pub fn is_valid_play(
    state: &GameState,
    who: &PlayerId,
    units: &[Unit],
    trump: Trump,
) -> Result<bool, DomainError> {
    let Some(lead) = state.current_trick.first() else {
        return Ok(true);
    };
    let trick_size = total_size(&lead.units);
    if total_size(units) != trick_size {
        return Ok(false);
    }
    let Some(suit) = common_suit(&lead.units) else {
        return Ok(false);
    };

    let suited = suited_cards(&state.player(who)?.hand, suit, trump);
    let played_suited: usize = units
        .iter()
        .filter(|u| u.suit() == suit)
        .map(Unit::size)
        .sum();

    if suited.len() > trick_size {
        if played_suited != trick_size {
            return Ok(false);
        }
        let matcher = Matcher::from_hand(&suited, &lead.units, trump, state.settings.wraparound);
        return Ok(matcher
            .possibilities()
            .iter()
            .any(|p| matches_possibility(units, p, &matcher, suit)));
    }
    Ok(played_suited == suited.len())
}

/// Winner of a complete trick and every point card in it.
pub fn compute_winner(state: &GameState) -> Result<(PlayerId, Vec<Card>), DomainError> {
    if state.current_trick.len() != state.players.len() {
        return Err(DomainError::validation_other(
            "Invariant violated: trick still in progress",
        ));
    }
    let mut best = 0;
    for (i, entry) in state.current_trick.iter().enumerate().skip(1) {
        if beats(&entry.units, &state.current_trick[best].units) {
            best = i;
        }
    }
    let points = state
        .current_trick
        .iter()
        .flat_map(TrickPlay::cards)
        .filter(|c| point_value(*c) > 0)
        .collect();
    Ok((state.current_trick[best].player_id.clone(), points))
}

fn reject(who: &PlayerId, kind: ValidationKind, detail: impl Into<String>) -> DomainError {
    let err = DomainError::validation(kind, detail);
    debug!(player_id = %who, error = %err, "Play rejected");
    err
}

/// Play `groups` (one card group per unit) into the current trick.
pub fn make_play(
    state: &mut GameState,
    who: &PlayerId,
    groups: &[Vec<Card>],
) -> Result<PlayResult, DomainError> {
    require_phase(state, Phase::Play, "make_play")?;
    require_turn(state, who)?;
    let trump = require_trump(state, "make_play")?;

    let mut units = parse_play(state, groups)?;
    sort_units_desc(&mut units);

    let mut forced = None;
    if state.current_trick.is_empty() && units.len() > 1 {
        if !check_throw_suited(&units) {
            return Err(reject(who, ValidationKind::InvalidThrowSuit, "Throw is not suited"));
        }
        if let Some(unit) = check_throw_valid(state, who, &units, trump)? {
            units = vec![unit.clone()];
            forced = Some(unit);
        }
    }

    // Only what is actually played has to be in hand.
    if !state.player(who)?.holds_all(&all_cards(&units)) {
        return Err(reject(who, ValidationKind::CardNotInHand, "Playing cards not in hand"));
    }

    if !is_valid_play(state, who, &units, trump)? {
        return Err(reject(who, ValidationKind::IllegalPlayShape, "Play does not follow the trick"));
    }

    // Validation done; mutate.
    let cards = all_cards(&units);
    state.player_mut(who)?.remove_cards(&cards)?;
    reveal_friends(state, who, &cards)?;
    state.current_trick.push(TrickPlay {
        player_id: who.clone(),
        units,
    });

    if state.current_trick.len() < state.players.len() {
        state.advance_turn()?;
        return Ok(match forced {
            Some(forced) => PlayResult::ForcedPlay { forced },
            None => PlayResult::Continue,
        });
    }

    // The turn wraps back to the leader before the winner takes it.
    state.advance_turn()?;
    let (winner, points) = compute_winner(state)?;
    let trick = std::mem::take(&mut state.current_trick);
    for entry in &trick {
        state
            .played
            .extend(entry.cards().into_iter().filter(|c| point_value(*c) == 0));
    }
    if state.is_friend(&winner) {
        state.played.extend(points.iter().copied());
    } else {
        state.player_mut(&winner)?.points.extend(points.iter().copied());
    }
    state.last_trick = trick;
    state.current_turn = winner.clone();
    info!(winner = %winner, points = points.len(), "Trick complete");

    let round_over = state.players.first().is_some_and(|p| p.hand.is_empty());
    if round_over {
        state.phase = Phase::Score;
        let result = calculate_score(state)?;
        return Ok(PlayResult::RoundComplete(result));
    }
    Ok(PlayResult::TrickComplete(TrickResult { winner, points }))
}

/// Consume friend calls matched by `cards`; the player who plays the
/// counted-down copy joins the friends and forfeits captured points.
fn reveal_friends(state: &mut GameState, who: &PlayerId, cards: &[Card]) -> Result<(), DomainError> {
    let mut revealed = false;
    for card in cards {
        for call in state.friend_calls.iter_mut().filter(|c| c.is_active()) {
            if call.card != *card {
                continue;
            }
            if call.nth <= 1 {
                call.revealed_by = Some(who.clone());
                revealed = true;
            } else {
                call.nth -= 1;
            }
        }
    }
    if revealed {
        let discarded = std::mem::take(&mut state.player_mut(who)?.points);
        state.played.extend(discarded);
        state.friends.insert(who.clone());
        info!(player_id = %who, "Friend revealed");
    }
    Ok(())
}

/// Legal card sets `who` could follow the current trick with, one per
/// enumerated structure possibility, lowest cards first. Empty when leading.
pub fn follow_options(state: &GameState, who: &PlayerId) -> Result<Vec<Vec<Card>>, DomainError> {
    let trump = require_trump(state, "follow_options")?;
    let Some(lead) = state.current_trick.first() else {
        return Ok(Vec::new());
    };
    let hand = &state.player(who)?.hand;
    Ok(legal_follows(hand, &lead.units, trump, state.settings.wraparound))
}

/// [`follow_options`] over a bare hand, for callers that only hold a
/// player's view of the table.
pub fn legal_follows(hand: &[Card], led: &[Unit], trump: Trump, wraparound: bool) -> Vec<Vec<Card>> {
    let Some(suit) = common_suit(led) else {
        return Vec::new();
    };
    let need = total_size(led);
    let suited = suited_cards(hand, suit, trump);

    if suited.len() <= need {
        let mut rest = hand.to_vec();
        remove_multiset(&mut rest, &suited);
        let mut chosen = suited;
        let fill = need - chosen.len();
        chosen.extend(rest.into_iter().take(fill));
        return vec![chosen];
    }

    let matcher = Matcher::from_hand(&suited, led, trump, wraparound);
    matcher
        .possibilities()
        .iter()
        .map(|p| {
            let mut chosen = p.cards();
            let mut rest = suited.clone();
            remove_multiset(&mut rest, &chosen);
            let fill = need.saturating_sub(chosen.len());
            chosen.extend(rest.into_iter().take(fill));
            chosen
        })
        .collect()
}

fn remove_multiset(pool: &mut Vec<Card>, cards: &[Card]) {
    for card in cards {
        if let Some(i) = pool.iter().position(|c| c == card) {
            pool.remove(i);
        }
    }
}
