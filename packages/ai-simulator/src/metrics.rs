//! Metrics collection and output for simulation results.

use serde::Serialize;

use crate::simulator::{GameResult, RoundRecord};
use crate::types::MetricsLevel;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundMetrics>,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub ai_types: Vec<String>,
    pub num_decks: u8,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub rounds_played: usize,
    pub final_ranks: Vec<String>,
    /// Seat that first advanced past the top rank, if anyone did.
    pub game_winner: Option<usize>,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u32,
    pub dealer: usize,
    pub declared: String,
    pub declarations: usize,
    pub redeals: u32,
    pub friends: Vec<usize>,
    pub points: u32,
    pub winners: Vec<usize>,
    pub attackers_won: bool,
    pub level_change: u32,
    pub tricks: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: usize,
    pub ai_type: String,
    pub final_rank: String,
    pub rounds_won: u32,
    pub rounds_as_dealer: u32,
    pub rounds_as_friend: u32,
    pub levels_gained: u32,
}

/// Build metrics from a finished game.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    config: GameConfig,
    level: &MetricsLevel,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let player_metrics = config
        .ai_types
        .iter()
        .enumerate()
        .map(|(seat, ai_type)| build_player_metrics(seat, ai_type, result))
        .collect();

    let rounds = match level {
        MetricsLevel::Basic => Vec::new(),
        MetricsLevel::Detailed => result.rounds.iter().map(build_round_metrics).collect(),
    };

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config,
        result: GameResultMetrics {
            rounds_played: result.rounds.len(),
            final_ranks: result.final_ranks.clone(),
            game_winner: result.game_winner_seats.first().copied(),
            duration_ms,
        },
        rounds,
        player_metrics,
    }
}

fn build_round_metrics(round: &RoundRecord) -> RoundMetrics {
    RoundMetrics {
        round_no: round.round_no,
        dealer: round.dealer_seat,
        declared: round.declared.clone(),
        declarations: round.declarations,
        redeals: round.redeals,
        friends: round.friend_seats.clone(),
        points: round.result.points,
        winners: round.winner_seats.clone(),
        attackers_won: round.winner_seats.contains(&round.dealer_seat),
        level_change: round.result.level_change,
        tricks: round.tricks,
    }
}

fn build_player_metrics(seat: usize, ai_type: &str, result: &GameResult) -> PlayerMetrics {
    let mut metrics = PlayerMetrics {
        seat,
        ai_type: ai_type.to_string(),
        final_rank: result.final_ranks.get(seat).cloned().unwrap_or_default(),
        rounds_won: 0,
        rounds_as_dealer: 0,
        rounds_as_friend: 0,
        levels_gained: 0,
    };
    for round in &result.rounds {
        if round.winner_seats.contains(&seat) {
            metrics.rounds_won += 1;
            metrics.levels_gained += round.result.level_change;
        }
        if round.dealer_seat == seat {
            metrics.rounds_as_dealer += 1;
        } else if round.friend_seats.contains(&seat) {
            metrics.rounds_as_friend += 1;
        }
    }
    metrics
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub rounds_played: usize,
    pub game_winner: Option<usize>,
    pub attacker_wins: usize,
    pub avg_points: f64,
    pub final_ranks: String,
    pub ai_types: String,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        let attacker_wins = metrics.rounds.iter().filter(|r| r.attackers_won).count();
        let total_points: u32 = metrics.rounds.iter().map(|r| r.points).sum();
        let avg_points = if metrics.rounds.is_empty() {
            0.0
        } else {
            f64::from(total_points) / metrics.rounds.len() as f64
        };
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.config.ai_types.len(),
            rounds_played: metrics.result.rounds_played,
            game_winner: metrics.result.game_winner,
            attacker_wins,
            avg_points,
            final_ranks: metrics.result.final_ranks.join(" "),
            ai_types: metrics.config.ai_types.join(" "),
        }
    }
}
