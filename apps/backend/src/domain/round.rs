//! Round lifecycle: starting a round, dealing, resetting the game and
//! between-round changes to the table.

use tracing::{debug, info};

use crate::domain::cards_types::Card;
use crate::domain::dealing::build_deck;
use crate::domain::player::{Player, PlayerId, PlayerProfile};
use crate::domain::seed_derivation::{derive_dealing_seed, derive_next_game_seed};
use crate::domain::settings::SettingsUpdate;
use crate::domain::state::{require_phase, GameState, Phase};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

fn require_between_rounds(state: &GameState, action: &str) -> Result<(), DomainError> {
    if state.phase != Phase::Score {
        return Err(DomainError::conflict(
            ConflictKind::RoundInProgress,
            format!("Cannot {action} while a round is in progress"),
        ));
    }
    Ok(())
}

/// `Score -> Deal`: fresh shuffled deck, empty hands, cleared round state.
pub fn start_round(state: &mut GameState) -> Result<(), DomainError> {
    require_phase(state, Phase::Score, "start_round")?;

    state.round_no = state.round_no.wrapping_add(1);
    let seed = derive_dealing_seed(state.seed, state.round_no);
    state.deck = build_deck(state.settings.num_decks, seed);
    state.bottom.clear();
    state.played.clear();
    state.friends.clear();
    state.friend_calls.clear();
    state.declarations.clear();
    state.declared = None;
    state.current_trick.clear();
    state.last_trick.clear();
    for player in &mut state.players {
        player.new_round();
    }
    state.phase = Phase::Deal;

    info!(round_no = state.round_no, deck = state.deck.len(), "Round started");
    Ok(())
}

/// Deal the top card to the current player and pass the turn.
///
/// Returns `None` once only the bottom is left in the deck.
pub fn deal_card(state: &mut GameState) -> Result<Option<Card>, DomainError> {
    require_phase(state, Phase::Deal, "deal_card")?;
    if state.deck.len() <= state.bottom_size as usize {
        return Ok(None);
    }
    // Resolve the seat before popping so a bad turn leaves the deck intact.
    let who = state.current_turn.clone();
    state.player(&who)?;
    let Some(card) = state.deck.pop() else {
        return Ok(None);
    };
    state.player_mut(&who)?.hand.push(card);
    state.advance_turn()?;
    Ok(Some(card))
}

/// Deal every remaining non-bottom card.
pub fn deal_all(state: &mut GameState) -> Result<usize, DomainError> {
    let mut dealt = 0;
    while deal_card(state)?.is_some() {
        dealt += 1;
    }
    Ok(dealt)
}

/// Throw in a fully dealt hand nobody declared on and deal a fresh one.
pub fn redeal(state: &mut GameState) -> Result<(), DomainError> {
    require_phase(state, Phase::Deal, "redeal")?;
    if state.deck.len() > state.bottom_size as usize {
        return Err(DomainError::validation(
            ValidationKind::DealingInProgress,
            "Finish dealing before a redeal",
        ));
    }
    if !state.declarations.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::IllegalDeclaration,
            "Trump was declared; no redeal",
        ));
    }
    info!(round_no = state.round_no, "No declaration, redealing");
    state.phase = Phase::Score;
    start_round(state)
}

/// Start a new game with the same settings and seats, dealt from a fresh seed.
pub fn reset(state: &mut GameState) -> Result<(), DomainError> {
    let players = state
        .players
        .iter()
        .map(|p| (p.id.clone(), p.profile.clone()))
        .collect();
    let seed = derive_next_game_seed(state.seed);
    *state = GameState::new(state.settings.clone(), players, seed)?;
    info!(seed, "Game reset");
    Ok(())
}

/// Apply a settings patch between rounds.
///
/// Seat count follows the seated players, so `num_players` cannot be patched
/// to disagree with them.
pub fn update_settings(state: &mut GameState, update: SettingsUpdate) -> Result<(), DomainError> {
    require_phase(state, Phase::Score, "update_settings")?;
    let mut next = state.settings.clone();
    next.apply(update)?;
    if next.num_players as usize != state.players.len() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSettings,
            format!(
                "num_players must match the {} seated players",
                state.players.len()
            ),
        ));
    }
    state.bottom_size = next.bottom_size();
    state.team_size = next.team_size();
    state.settings = next;
    debug!(settings = ?state.settings, "Settings updated");
    Ok(())
}

/// Seat a new player between rounds.
pub fn add_player(
    state: &mut GameState,
    id: PlayerId,
    profile: PlayerProfile,
) -> Result<(), DomainError> {
    require_between_rounds(state, "join")?;
    if state.players.iter().any(|p| p.id == id) {
        return Err(DomainError::conflict(
            ConflictKind::SeatTaken,
            format!("{id} is already seated"),
        ));
    }
    let count = u8::try_from(state.players.len() + 1)
        .map_err(|_| DomainError::conflict(ConflictKind::TableFull, "Table is full"))?;
    let mut next = state.settings.clone();
    next.num_players = count;
    next.validate()?;

    if state.round_no == 0 {
        state.winners.insert(id.clone());
    }
    let seat = state.players.len();
    state.players.push(Player::new(id.clone(), seat, profile));
    state.bottom_size = next.bottom_size();
    state.team_size = next.team_size();
    state.settings = next;
    info!(player_id = %id, seat, "Player joined");
    Ok(())
}

/// Remove a player between rounds; later seats shift down by one.
pub fn remove_player(state: &mut GameState, id: &PlayerId) -> Result<Player, DomainError> {
    require_between_rounds(state, "leave")?;
    let seat = state.seat_of(id)?;
    let mut next = state.settings.clone();
    next.num_players = next.num_players.saturating_sub(1);
    next.validate()?;

    if &state.current_turn == id {
        state.current_turn = state.player_at_offset(seat, 1).id.clone();
    }
    let removed = state.players.remove(seat);
    for (i, p) in state.players.iter_mut().enumerate() {
        p.seat = i;
    }
    state.winners.remove(id);
    state.friends.remove(id);
    state.bottom_size = next.bottom_size();
    state.team_size = next.team_size();
    state.settings = next;
    info!(player_id = %id, seat, "Player left");
    Ok(removed)
}
