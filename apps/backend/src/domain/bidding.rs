//! Trump declaration during the deal, and the `Deal -> Bottom` transition.

use tracing::{debug, info};

use crate::domain::cards_logic::sort_hand;
use crate::domain::cards_types::Card;
use crate::domain::player::PlayerId;
use crate::domain::state::{require_phase, require_trump, DealPhaseResult, Declaration, GameState, Phase};
use crate::errors::domain::{DomainError, ValidationKind};

fn illegal(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::IllegalDeclaration, detail)
}

/// Check a declaration against the log without touching state.
fn validate_declaration(
    state: &GameState,
    who: &PlayerId,
    card: Card,
    amount: u8,
) -> Result<(), DomainError> {
    require_phase(state, Phase::Deal, "declare")?;
    let player = state.player(who)?;
    if amount == 0 {
        return Err(illegal("Must declare at least one card"));
    }
    if card.rank() != Some(player.rank) {
        return Err(illegal(format!(
            "{who} may only declare cards of their rank {:?}",
            player.rank
        )));
    }
    if state.settings.winners_declare && !state.winners.contains(who) {
        return Err(illegal("Only last round's winners may declare"));
    }
    if player.copies_of(card) < amount as usize {
        return Err(DomainError::validation(
            ValidationKind::InsufficientCards,
            format!("{who} holds fewer than {amount} copies of {card}"),
        ));
    }

    let Some(prev) = state.declarations.last() else {
        return Ok(());
    };
    if amount == prev.amount && prev.reinforce_eligible {
        let original = state
            .declarations
            .len()
            .checked_sub(2)
            .and_then(|i| state.declarations.get(i));
        match original {
            Some(orig) if &orig.player_id == who && orig.card == card => Ok(()),
            _ => Err(illegal("Invalid reinforcement")),
        }
    } else if amount <= prev.amount {
        Err(illegal(format!(
            "Need more than {} cards to overturn",
            prev.amount
        )))
    } else {
        Ok(())
    }
}

/// Declare `amount` copies of `card` as trump.
///
/// An overturn must use strictly more cards than the standing declaration,
/// except that the player it overturned may answer with the same amount of
/// their original card (a reinforcement).
pub fn declare(
    state: &mut GameState,
    who: &PlayerId,
    card: Card,
    amount: u8,
) -> Result<Declaration, DomainError> {
    if let Err(e) = validate_declaration(state, who, card, amount) {
        debug!(player_id = %who, %card, amount, error = %e, "Declaration rejected");
        return Err(e);
    }

    // The overturned player may contest only while they still hold enough
    // copies of their own card.
    let (reinforce_eligible, prev_player) = match state.declarations.last() {
        Some(prev) if prev.amount < amount => {
            let can = state.player(&prev.player_id)?.copies_of(prev.card) >= amount as usize;
            (can, can.then(|| prev.player_id.clone()))
        }
        _ => (false, None),
    };

    let declaration = Declaration {
        card,
        amount,
        player_id: who.clone(),
        reinforce_eligible,
        prev_player,
    };
    state.declarations.push(declaration.clone());
    info!(player_id = %who, %card, amount, reinforce_eligible, "Trump declared");
    Ok(declaration)
}

/// `Deal -> Bottom`: the standing declaration fixes trump, its declarer
/// becomes dealer and takes the remaining deck.
pub fn end_deal_phase(state: &mut GameState) -> Result<DealPhaseResult, DomainError> {
    require_phase(state, Phase::Deal, "end_deal_phase")?;
    if state.deck.len() > state.bottom_size as usize {
        return Err(DomainError::validation(
            ValidationKind::DealingInProgress,
            format!("{} cards still to deal", state.deck.len() - state.bottom_size as usize),
        ));
    }
    let Some(last) = state.declarations.last() else {
        return Err(illegal("No one has declared"));
    };
    let dealer = last.player_id.clone();
    let declared = last.card;
    state.player(&dealer)?;

    state.declared = Some(declared);
    let trump = require_trump(state, "end_deal_phase")?;
    let bottom = std::mem::take(&mut state.deck);
    state.current_turn = dealer.clone();
    state.friends.insert(dealer.clone());
    state.player_mut(&dealer)?.hand.extend(bottom.iter().copied());
    for player in &mut state.players {
        sort_hand(&mut player.hand, trump);
    }
    state.phase = Phase::Bottom;

    info!(dealer = %dealer, %declared, bottom = bottom.len(), "Dealing ended");
    Ok(DealPhaseResult { dealer, bottom })
}
