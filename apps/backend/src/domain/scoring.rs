use tracing::info;

use crate::domain::cards_logic::points_of;
use crate::domain::player::PlayerId;
use crate::domain::rules::level_change;
use crate::domain::state::{GameState, RoundResult};
use crate::errors::domain::DomainError;

/// Tally the finished round, advance the winners' ranks and record them as
/// the next round's `winners`.
///
/// `current_turn` must be the winner of the final trick: the bottom only
/// scores when that player is not a friend.
pub fn calculate_score(state: &mut GameState) -> Result<RoundResult, DomainError> {
    let cutoff = state.settings.cutoff();

    let mut points: u32 = state
        .players
        .iter()
        .filter(|p| !state.friends.contains(&p.id))
        .map(|p| points_of(&p.points))
        .fold(0, u32::saturating_add);
    if !state.friends.contains(&state.current_turn) {
        let bottom = points_of(&state.bottom).saturating_mul(state.settings.bottom_multiplier);
        points = points.saturating_add(bottom);
    }

    let (winners, multiplier): (Vec<PlayerId>, u32) = if points >= cutoff {
        let defenders = state
            .players
            .iter()
            .filter(|p| !state.friends.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        (defenders, 1)
    } else {
        let attackers = state
            .players
            .iter()
            .filter(|p| state.friends.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();
        let multiplier = (u32::from(state.team_size) + 1).saturating_sub(state.friends.len() as u32);
        (attackers, multiplier)
    };
    let level_change = level_change(points, cutoff, multiplier);

    let mut game_winners = Vec::new();
    for id in &winners {
        if state.player_mut(id)?.increment_rank(level_change) {
            game_winners.push(id.clone());
        }
    }
    state.winners = winners.iter().cloned().collect();

    let result = RoundResult {
        winners,
        level_change,
        game_winners,
        points,
        bottom: state.bottom.clone(),
    };
    info!(
        points,
        cutoff,
        level_change,
        winners = ?result.winners,
        game_winners = ?result.game_winners,
        "Round scored"
    );
    state.last_round = Some(result.clone());
    Ok(result)
}
