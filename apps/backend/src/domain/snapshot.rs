//! Per-viewer projection of the game state.
//!
//! Hands are private: a snapshot carries only the viewer's own hand plus
//! hand sizes for everyone else. A declaration's reinforcement eligibility
//! is shown only to the player it concerns, and the bottom only to the
//! dealer until the round is scored.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::{Card, Rank};
use crate::domain::player::PlayerId;
use crate::domain::settings::Settings;
use crate::domain::state::{FriendCall, GameState, Phase, RoundResult, TrickPlay};

/// Public info about a single seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: usize,
    pub player_id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
    pub rank: Rank,
    pub hand_size: usize,
    pub points: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationPublic {
    pub card: Card,
    pub amount: u8,
    pub player_id: PlayerId,
    /// True only in the snapshot of the overturned player who may reinforce.
    pub can_reinforce: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub viewer: Option<PlayerId>,
    pub phase: Phase,
    pub round_no: u32,
    pub settings: Settings,
    pub bottom_size: u16,
    pub team_size: u8,
    pub seats: Vec<SeatPublic>,
    pub current_turn: PlayerId,
    pub declared: Option<Card>,
    pub declarations: Vec<DeclarationPublic>,
    pub friend_calls: Vec<FriendCall>,
    pub friends: Vec<PlayerId>,
    pub winners: Vec<PlayerId>,
    pub current_trick: Vec<TrickPlay>,
    pub last_trick: Vec<TrickPlay>,
    pub deck_remaining: usize,
    /// The viewer's own hand; empty for spectators.
    pub hand: Vec<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Vec<Card>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_round: Option<RoundResult>,
}

fn bottom_visible(state: &GameState, viewer: Option<&PlayerId>) -> bool {
    match state.phase {
        Phase::Score => true,
        Phase::Play => {
            let dealer = state.declarations.last().map(|d| &d.player_id);
            viewer.is_some() && viewer == dealer
        }
        Phase::Deal | Phase::Bottom => false,
    }
}

/// Project `state` for `viewer` (`None` for a spectator).
pub fn snapshot(state: &GameState, viewer: Option<&PlayerId>) -> GameSnapshot {
    let seats = state
        .players
        .iter()
        .map(|p| SeatPublic {
            seat: p.seat,
            player_id: p.id.clone(),
            name: p.profile.name.clone(),
            avatar_uri: p.profile.avatar_uri.clone(),
            rank: p.rank,
            hand_size: p.hand.len(),
            points: p.points.clone(),
        })
        .collect();

    let declarations = state
        .declarations
        .iter()
        .map(|d| DeclarationPublic {
            card: d.card,
            amount: d.amount,
            player_id: d.player_id.clone(),
            can_reinforce: d.reinforce_eligible
                && viewer.is_some()
                && d.prev_player.as_ref() == viewer,
        })
        .collect();

    let hand = viewer
        .and_then(|v| state.players.iter().find(|p| &p.id == v))
        .map(|p| p.hand.clone())
        .unwrap_or_default();

    GameSnapshot {
        viewer: viewer.cloned(),
        phase: state.phase,
        round_no: state.round_no,
        settings: state.settings.clone(),
        bottom_size: state.bottom_size,
        team_size: state.team_size,
        seats,
        current_turn: state.current_turn.clone(),
        declared: state.declared,
        declarations,
        friend_calls: state.friend_calls.clone(),
        friends: state.friends.iter().cloned().collect(),
        winners: state.winners.iter().cloned().collect(),
        current_trick: state.current_trick.clone(),
        last_trick: state.last_trick.clone(),
        deck_remaining: state.deck.len(),
        hand,
        bottom: bottom_visible(state, viewer).then(|| state.bottom.clone()),
        last_round: state.last_round.clone(),
    }
}
