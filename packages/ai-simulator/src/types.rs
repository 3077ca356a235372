//! Shared types for the simulator.

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line.
    Jsonl,
    /// A single JSON array.
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum MetricsLevel {
    /// Per-game and per-seat totals only.
    Basic,
    /// Adds a record for every round.
    Detailed,
}
