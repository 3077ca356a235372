//! In-memory table simulator.
//!
//! Seats bots at a [`TableSession`] and feeds it the same client messages a
//! live table would receive, so every move goes through full validation.

use std::fmt;

use tracing::debug;
use uuid::Uuid;
use zpy_backend::ai::{AiError, AiPlayer};
use zpy_backend::domain::seed_derivation::derive_bot_seed;
use zpy_backend::domain::state::{GameState, Phase, RoundResult};
use zpy_backend::domain::{PlayerId, Settings};
use zpy_backend::{create_ai, AiConfig, AppError, ClientMsg, TableSession};

/// Deals without any declaration before the simulator gives up on a round.
pub const MAX_REDEALS: u32 = 20;

/// What happened in one simulated round.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round_no: u32,
    pub dealer_seat: usize,
    pub declared: String,
    pub declarations: usize,
    pub redeals: u32,
    pub friend_seats: Vec<usize>,
    pub result: RoundResult,
    pub winner_seats: Vec<usize>,
    pub tricks: u32,
}

/// Result of simulating a game of several rounds.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub rounds: Vec<RoundRecord>,
    /// Rank of each seat after the last round.
    pub final_ranks: Vec<String>,
    /// Seats that advanced past the top rank, in round order.
    pub game_winner_seats: Vec<usize>,
}

pub struct Simulator {
    table: TableSession,
    seats: Vec<PlayerId>,
    bots: Vec<Box<dyn AiPlayer>>,
}

impl Simulator {
    /// Seat `ai_types.len()` bots at a fresh table and start the game.
    pub fn new(settings: Settings, seed: u64, ai_types: &[String]) -> Result<Self, SimulatorError> {
        let mut table = TableSession::new(Uuid::new_v4(), "simulation", settings, seed);
        let mut seats = Vec::with_capacity(ai_types.len());
        let mut bots = Vec::with_capacity(ai_types.len());

        for (seat, ai_type) in ai_types.iter().enumerate() {
            let id = PlayerId::from(format!("bot{seat}"));
            let config = AiConfig::with_seed(derive_bot_seed(seed, seat));
            let bot = create_ai(ai_type, config)
                .ok_or_else(|| SimulatorError::UnknownAi(ai_type.clone()))?;
            table.handle(
                &id,
                ClientMsg::Join {
                    name: format!("{ai_type} {seat}"),
                    avatar_uri: None,
                },
            )?;
            seats.push(id);
            bots.push(bot);
        }

        let host = seats
            .first()
            .cloned()
            .ok_or_else(|| SimulatorError::InvalidState("No seats".into()))?;
        table.handle(&host, ClientMsg::StartGame)?;
        Ok(Self { table, seats, bots })
    }

    /// Play `rounds` rounds, stopping early once someone wins the game.
    pub fn simulate_game(mut self, rounds: u32) -> Result<GameResult, SimulatorError> {
        let mut records = Vec::new();
        let mut game_winner_seats = Vec::new();

        for _ in 0..rounds {
            let record = self.play_round()?;
            for id in &record.result.game_winners {
                game_winner_seats.push(self.seat(id)?);
            }
            let done = !record.result.game_winners.is_empty();
            records.push(record);
            if done {
                break;
            }
        }

        let final_ranks = self
            .game()?
            .players
            .iter()
            .map(|p| format!("{:?}", p.rank))
            .collect();
        Ok(GameResult {
            rounds: records,
            final_ranks,
            game_winner_seats,
        })
    }

    fn play_round(&mut self) -> Result<RoundRecord, SimulatorError> {
        let host = self.seats[0].clone();
        self.send(&host, ClientMsg::StartRound)?;
        let round_no = self.game()?.round_no;

        let mut redeals = 0;
        loop {
            self.deal_with_declarations()?;
            if !self.game()?.declarations.is_empty() {
                break;
            }
            redeals += 1;
            if redeals > MAX_REDEALS {
                return Err(SimulatorError::NoDeclaration(round_no));
            }
            debug!(round_no, redeals, "Nobody declared, redealing");
            self.send(&host, ClientMsg::Redeal)?;
        }

        let declarations = self.game()?.declarations.len();
        self.send(&host, ClientMsg::EndDealPhase)?;
        let dealer = self.game()?.current_turn.clone();
        let dealer_seat = self.seat(&dealer)?;
        let declared = self
            .game()?
            .declared
            .map(|c| c.to_string())
            .unwrap_or_default();

        let view = self.view(&dealer)?;
        let choice = self.bots[dealer_seat]
            .choose_bottom(&view)
            .map_err(|e| SimulatorError::Ai(dealer_seat, "bottom", e))?;
        self.send(
            &dealer,
            ClientMsg::EndBottomPhase {
                bottom: choice.bottom,
                friend_calls: choice.friend_calls,
            },
        )?;

        let mut tricks = 0;
        while self.game()?.phase == Phase::Play {
            let who = self.game()?.current_turn.clone();
            let seat = self.seat(&who)?;
            let view = self.view(&who)?;
            let play = self.bots[seat]
                .choose_play(&view)
                .map_err(|e| SimulatorError::Ai(seat, "play", e))?;
            let before = self.game()?.last_trick.clone();
            self.send(&who, ClientMsg::MakePlay { play })?;
            if self.game()?.last_trick != before {
                tricks += 1;
            }
        }

        let game = self.game()?;
        let result = game
            .last_round
            .clone()
            .ok_or_else(|| SimulatorError::InvalidState("Round ended without a result".into()))?;
        let friend_seats: Vec<usize> = game
            .friends
            .iter()
            .map(|id| self.seat(id))
            .collect::<Result<_, _>>()?;
        let winner_seats: Vec<usize> = result
            .winners
            .iter()
            .map(|id| self.seat(id))
            .collect::<Result<_, _>>()?;

        Ok(RoundRecord {
            round_no,
            dealer_seat,
            declared,
            declarations,
            redeals,
            friend_seats,
            result,
            winner_seats,
            tricks,
        })
    }

    /// Deal card by card, letting each seat declare after every card.
    fn deal_with_declarations(&mut self) -> Result<(), SimulatorError> {
        let host = self.seats[0].clone();
        loop {
            let game = self.game()?;
            if game.deck.len() <= game.bottom_size as usize {
                return Ok(());
            }
            self.send(&host, ClientMsg::DealCard)?;

            for seat in 0..self.seats.len() {
                let id = self.seats[seat].clone();
                let view = self.view(&id)?;
                let choice = self.bots[seat]
                    .choose_declaration(&view)
                    .map_err(|e| SimulatorError::Ai(seat, "declare", e))?;
                if let Some((card, amount)) = choice {
                    self.send(&id, ClientMsg::Declare { card, amount })?;
                }
            }
        }
    }

    fn send(&mut self, who: &PlayerId, msg: ClientMsg) -> Result<(), SimulatorError> {
        self.table.handle(who, msg)?;
        Ok(())
    }

    fn game(&self) -> Result<&GameState, SimulatorError> {
        self.table
            .game()
            .ok_or_else(|| SimulatorError::InvalidState("Game has not started".into()))
    }

    fn view(&self, who: &PlayerId) -> Result<zpy_backend::GameSnapshot, SimulatorError> {
        self.table
            .view(Some(who))
            .ok_or_else(|| SimulatorError::InvalidState("Game has not started".into()))
    }

    fn seat(&self, id: &PlayerId) -> Result<usize, SimulatorError> {
        self.seats
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| SimulatorError::InvalidState(format!("{id} is not seated")))
    }
}

/// Errors that can occur during simulation.
#[derive(Debug)]
pub enum SimulatorError {
    /// AI returned an error
    Ai(usize, &'static str, AiError),
    /// The table rejected a bot's message
    Table(AppError),
    UnknownAi(String),
    /// Nobody declared within [`MAX_REDEALS`] deals
    NoDeclaration(u32),
    InvalidState(String),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::Ai(seat, action, err) => {
                write!(f, "AI error (seat {seat}, {action}): {err}")
            }
            SimulatorError::Table(err) => write!(f, "Table rejected move: {err}"),
            SimulatorError::UnknownAi(name) => write!(f, "Unknown AI type: {name}"),
            SimulatorError::NoDeclaration(round) => {
                write!(f, "Round {round}: nobody declared after {MAX_REDEALS} redeals")
            }
            SimulatorError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<AppError> for SimulatorError {
    fn from(err: AppError) -> Self {
        SimulatorError::Table(err)
    }
}
