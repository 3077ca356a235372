//! Table simulator CLI - bot-only games for exercising the rules engine.
//!
//! Runs games in memory through the same table layer live players use,
//! writing per-game metrics for offline analysis.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use metrics::{build_game_metrics, GameConfig};
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{MetricsLevel, OutputFormat};
use zpy_backend::domain::SettingsUpdate;
use zpy_backend::{AppError, RandomPlayer, TableDefaults};

#[derive(Parser)]
#[command(name = "zpy-sim")]
#[command(about = "In-memory finding-friends simulator for bot seats")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Maximum rounds per game (a game also ends when someone passes the top rank)
    #[arg(short, long, default_value = "10")]
    rounds: u32,

    /// Seats at the table
    #[arg(long, default_value = "4")]
    players: u8,

    /// Decks in play (defaults to ZPY_NUM_DECKS or 1)
    #[arg(long)]
    decks: Option<u8>,

    /// AI type for every seat
    #[arg(long, default_value = "random")]
    seats: AiType,

    /// Base seed; game `n` uses `seed + n`
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the detail file
    #[arg(long)]
    compress: bool,

    /// Metrics detail level
    #[arg(long, default_value = "detailed")]
    metrics_level: MetricsLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum AiType {
    Random,
}

impl AiType {
    fn name(&self) -> &'static str {
        match self {
            AiType::Random => RandomPlayer::NAME,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = TableDefaults::from_env()?.settings;
    settings
        .apply(SettingsUpdate {
            num_players: Some(args.players),
            num_decks: args.decks,
            ..SettingsUpdate::default()
        })
        .map_err(AppError::from)?;
    let ai_types = vec![args.seats.name().to_string(); usize::from(args.players)];

    if args.show_output {
        info!(
            games = args.games,
            rounds = args.rounds,
            players = args.players,
            decks = settings.num_decks,
            ai = args.seats.name(),
            "Starting simulator"
        );
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;
    if args.show_output {
        info!("Output directory: {}", args.output_dir);
    }

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = base_seed.wrapping_add(u64::from(game_num));

        let game_res = Simulator::new(settings.clone(), game_seed, &ai_types)
            .and_then(|sim| sim.simulate_game(args.rounds));

        match game_res {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    game_seed,
                    GameConfig {
                        ai_types: ai_types.clone(),
                        num_decks: settings.num_decks,
                        total_games: args.games,
                    },
                    &args.metrics_level,
                    &result,
                    duration_ms,
                );

                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        game_num,
                        rounds = result.rounds.len(),
                        ranks = ?result.final_ranks,
                        "Game completed"
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!(game_num, seed = game_seed, "Game failed: {}", e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (detail_path, csv_path) = output_writer.output_paths();
    let (detail_path, csv_path) = (detail_path.clone(), csv_path.clone());
    output_writer.finish()?;

    if args.show_output {
        info!("Detailed results written to: {}", detail_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games, usize::from(args.players));
    }

    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32, seats: usize) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let rounds: Vec<_> = results.iter().flat_map(|r| &r.rounds).collect();
    let attacker_wins = rounds
        .iter()
        .filter(|r| r.winner_seats.contains(&r.dealer_seat))
        .count();
    let redeals: u32 = rounds.iter().map(|r| r.redeals).sum();
    let points: u32 = rounds.iter().map(|r| r.result.points).sum();
    if !rounds.is_empty() {
        println!("Rounds played: {}", rounds.len());
        println!(
            "Attackers won: {} ({:.1}%)",
            attacker_wins,
            attacker_wins as f64 / rounds.len() as f64 * 100.0
        );
        println!(
            "Average defender points: {:.1}",
            f64::from(points) / rounds.len() as f64
        );
        println!("Redeals: {}", redeals);
    }

    println!("\n=== Results by Seat ===");
    for seat in 0..seats {
        let won = rounds.iter().filter(|r| r.winner_seats.contains(&seat)).count();
        let dealt = rounds.iter().filter(|r| r.dealer_seat == seat).count();
        let game_wins = results
            .iter()
            .filter(|r| r.game_winner_seats.first() == Some(&seat))
            .count();
        println!(
            "Seat {}: rounds won={}, dealer={}, game wins={}",
            seat, won, dealt, game_wins
        );
    }
}
