//! Bottom exchange: `Bottom -> Play`.

use tracing::info;

use crate::domain::cards_types::Card;
use crate::domain::player::PlayerId;
use crate::domain::state::{require_phase, require_turn, FriendCall, GameState, Phase};
use crate::errors::domain::{DomainError, ValidationKind};

/// Dealer sets `bottom` aside and calls `team_size - 1` friends.
pub fn end_bottom_phase(
    state: &mut GameState,
    who: &PlayerId,
    bottom: Vec<Card>,
    friend_calls: Vec<FriendCall>,
) -> Result<(), DomainError> {
    require_phase(state, Phase::Bottom, "end_bottom_phase")?;
    require_turn(state, who)?;

    let needed = usize::from(state.team_size.saturating_sub(1));
    if friend_calls.len() != needed {
        return Err(DomainError::validation(
            ValidationKind::IncompleteFriendCalls,
            format!(
                "Need to call {needed} friend{}",
                if needed == 1 { "" } else { "s" }
            ),
        ));
    }
    if friend_calls.iter().any(|c| c.nth == 0) {
        return Err(DomainError::validation(
            ValidationKind::IncompleteFriendCalls,
            "Friend calls count copies from 1",
        ));
    }
    if bottom.len() != state.bottom_size as usize {
        return Err(DomainError::validation(
            ValidationKind::WrongBottomSize,
            format!("Bottom must be {} cards", state.bottom_size),
        ));
    }

    // remove_cards validates containment before it mutates
    state.player_mut(who)?.remove_cards(&bottom)?;
    state.bottom = bottom;
    state.friend_calls = friend_calls
        .into_iter()
        .map(|c| FriendCall::new(c.card, c.nth))
        .collect();
    state.phase = Phase::Play;

    info!(dealer = %who, calls = state.friend_calls.len(), "Bottom set, play begins");
    Ok(())
}
