use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards_logic::Trump;
use crate::domain::cards_types::Card;
use crate::domain::combos::{all_cards, Unit};
use crate::domain::player::{Player, PlayerId, PlayerProfile};
use crate::domain::settings::Settings;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Round phases, cycling `Score -> Deal -> Bottom -> Play -> Score`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Cards are dealt one at a time; trump may be declared.
    Deal,
    /// Dealer exchanges the bottom and calls friends.
    Bottom,
    /// Trick play.
    Play,
    /// Between rounds. A fresh game starts here.
    Score,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Deal => "deal",
            Phase::Bottom => "bottom",
            Phase::Play => "play",
            Phase::Score => "score",
        };
        f.write_str(s)
    }
}

/// One trump bid in the declaration log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub card: Card,
    pub amount: u8,
    pub player_id: PlayerId,
    /// The overturned declarer can still answer with a reinforcement.
    /// Only meaningful to `prev_player`.
    pub reinforce_eligible: bool,
    pub prev_player: Option<PlayerId>,
}

/// Hidden teammate designation: whoever plays the `nth` next copy of `card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendCall {
    pub card: Card,
    pub nth: u8,
    #[serde(default)]
    pub revealed_by: Option<PlayerId>,
}

impl FriendCall {
    pub fn new(card: Card, nth: u8) -> Self {
        Self {
            card,
            nth,
            revealed_by: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.revealed_by.is_none()
    }
}

/// One player's submission into the current trick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub player_id: PlayerId,
    pub units: Vec<Unit>,
}

impl TrickPlay {
    pub fn cards(&self) -> Vec<Card> {
        all_cards(&self.units)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPhaseResult {
    pub dealer: PlayerId,
    /// Addressed to the dealer only.
    pub bottom: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickResult {
    pub winner: PlayerId,
    pub points: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub winners: Vec<PlayerId>,
    pub level_change: u32,
    /// Winners whose rank advanced past the end of the sequence.
    pub game_winners: Vec<PlayerId>,
    pub points: u32,
    pub bottom: Vec<Card>,
}

/// Outcome of `make_play`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayResult {
    /// Play accepted, trick still in progress.
    Continue,
    /// A throw was cut down to the unit an opponent could beat.
    ForcedPlay { forced: Unit },
    TrickComplete(TrickResult),
    RoundComplete(RoundResult),
}

/// Authoritative state of one table's game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub phase: Phase,
    /// Undealt cards; dealing pops from the end.
    pub deck: Vec<Card>,
    /// Seated players, index == seat.
    pub players: Vec<Player>,
    pub bottom: Vec<Card>,
    pub bottom_size: u16,
    pub team_size: u8,
    /// Trump card of the round, set when dealing ends.
    pub declared: Option<Card>,
    pub declarations: Vec<Declaration>,
    pub friend_calls: Vec<FriendCall>,
    pub friends: BTreeSet<PlayerId>,
    /// Winners of the most recent round.
    pub winners: BTreeSet<PlayerId>,
    pub current_turn: PlayerId,
    pub current_trick: Vec<TrickPlay>,
    /// Last completed trick, for display.
    pub last_trick: Vec<TrickPlay>,
    /// Completed-trick cards not held as captured points.
    pub played: Vec<Card>,
    pub last_round: Option<RoundResult>,
    /// Counts every `start_round`.
    pub round_no: u32,
    pub seed: u64,
}

impl GameState {
    /// New game waiting in `Score` for the first `start_round`.
    pub fn new(
        settings: Settings,
        players: Vec<(PlayerId, PlayerProfile)>,
        seed: u64,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        if players.len() != settings.num_players as usize {
            return Err(DomainError::validation(
                ValidationKind::InvalidSettings,
                format!(
                    "Need all {} players to start, got {}",
                    settings.num_players,
                    players.len()
                ),
            ));
        }
        let mut seen = BTreeSet::new();
        if !players.iter().all(|(id, _)| seen.insert(id.clone())) {
            return Err(DomainError::validation(
                ValidationKind::InvalidSettings,
                "Duplicate player id",
            ));
        }

        let players: Vec<Player> = players
            .into_iter()
            .enumerate()
            .map(|(seat, (id, profile))| Player::new(id, seat, profile))
            .collect();
        let winners = players.iter().map(|p| p.id.clone()).collect();
        let current_turn = players[0].id.clone();

        Ok(Self {
            bottom_size: settings.bottom_size(),
            team_size: settings.team_size(),
            settings,
            phase: Phase::Score,
            deck: Vec::new(),
            players,
            bottom: Vec::new(),
            declared: None,
            declarations: Vec::new(),
            friend_calls: Vec::new(),
            friends: BTreeSet::new(),
            winners,
            current_turn,
            current_trick: Vec::new(),
            last_trick: Vec::new(),
            played: Vec::new(),
            last_round: None,
            round_no: 0,
            seed,
        })
    }

    pub fn player(&self, id: &PlayerId) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("No player {id}")))
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("No player {id}")))
    }

    pub fn seat_of(&self, id: &PlayerId) -> Result<usize, DomainError> {
        self.player(id).map(|p| p.seat)
    }

    pub fn current_player(&self) -> Result<&Player, DomainError> {
        self.player(&self.current_turn)
    }

    pub fn current_seat(&self) -> Result<usize, DomainError> {
        self.seat_of(&self.current_turn)
    }

    /// Player `offset` seats clockwise from `seat`.
    pub fn player_at_offset(&self, seat: usize, offset: usize) -> &Player {
        &self.players[(seat + offset) % self.players.len()]
    }

    /// Move the turn one seat clockwise.
    pub fn advance_turn(&mut self) -> Result<(), DomainError> {
        let seat = self.current_seat()?;
        self.current_turn = self.player_at_offset(seat, 1).id.clone();
        Ok(())
    }

    pub fn trump(&self) -> Option<Trump> {
        self.declared.and_then(Trump::from_declared)
    }

    /// Every card currently in the round, wherever it sits.
    pub fn card_count(&self) -> usize {
        let held: usize = self
            .players
            .iter()
            .map(|p| p.hand.len() + p.points.len())
            .sum();
        let in_trick: usize = self.current_trick.iter().map(|t| t.cards().len()).sum();
        held + in_trick + self.deck.len() + self.bottom.len() + self.played.len()
    }

    pub fn is_friend(&self, id: &PlayerId) -> bool {
        self.friends.contains(id)
    }
}

pub fn require_phase(state: &GameState, phase: Phase, action: &str) -> Result<(), DomainError> {
    if state.phase != phase {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            format!("{action} requires {phase} phase, current phase is {}", state.phase),
        ));
    }
    Ok(())
}

pub fn require_turn(state: &GameState, who: &PlayerId) -> Result<(), DomainError> {
    state.player(who)?;
    if &state.current_turn != who {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("It is {}'s turn, not {who}'s", state.current_turn),
        ));
    }
    Ok(())
}

pub fn require_trump(state: &GameState, ctx: &'static str) -> Result<Trump, DomainError> {
    state.trump().ok_or_else(|| {
        DomainError::validation_other(format!("Invariant violated: trump must be declared ({ctx})"))
    })
}
