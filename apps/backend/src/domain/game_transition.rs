//! Explicit change stream between two game states, consumed by the
//! replication layer after each operation.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::Card;
use crate::domain::player::PlayerId;
use crate::domain::state::{GameState, Phase, RoundResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundTransition {
    /// Edge-triggered: a trump declaration was appended.
    Declared {
        player_id: PlayerId,
        card: Card,
        amount: u8,
    },
    /// Edge-triggered: a hidden friend was revealed during play.
    FriendRevealed { player_id: PlayerId },
    /// Edge-triggered: a trick completed and was taken by `winner`.
    TrickCompleted { winner: PlayerId },
    PhaseChanged { from: Phase, to: Phase },
    /// Edge-triggered: the round was scored.
    RoundScored { result: RoundResult },
    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: PlayerId },
}

/// Derive transitions from before/after state.
pub fn derive_round_transitions(before: &GameState, after: &GameState) -> Vec<RoundTransition> {
    let mut transitions = Vec::new();
    let same_round = before.round_no == after.round_no;

    // 1. New declarations
    let seen = if same_round { before.declarations.len() } else { 0 };
    for d in after.declarations.iter().skip(seen) {
        transitions.push(RoundTransition::Declared {
            player_id: d.player_id.clone(),
            card: d.card,
            amount: d.amount,
        });
    }

    // 2. Reveals (the dealer joining at end of deal is not a reveal)
    if after.phase == Phase::Play || (before.phase == Phase::Play && after.phase == Phase::Score) {
        for id in after.friends.difference(&before.friends) {
            transitions.push(RoundTransition::FriendRevealed {
                player_id: id.clone(),
            });
        }
    }

    // 3. Trick completion
    if !after.last_trick.is_empty() && (!same_round || before.last_trick != after.last_trick) {
        transitions.push(RoundTransition::TrickCompleted {
            winner: after.current_turn.clone(),
        });
    }

    // 4. Phase edge
    if before.phase != after.phase {
        transitions.push(RoundTransition::PhaseChanged {
            from: before.phase,
            to: after.phase,
        });
        if after.phase == Phase::Score {
            if let Some(result) = &after.last_round {
                transitions.push(RoundTransition::RoundScored {
                    result: result.clone(),
                });
            }
        }
    }

    // 5. Turn change
    if before.current_turn != after.current_turn {
        transitions.push(RoundTransition::TurnBecame {
            player_id: after.current_turn.clone(),
        });
    }

    transitions
}
