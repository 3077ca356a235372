//! RNG seed derivation utilities for deterministic table behavior.
//!
//! Provides functions to derive unique-but-deterministic seeds for different
//! contexts (dealing, bot decisions) from a base table seed.

/// Derive a seed for shuffling the deck of a round.
///
/// # Arguments
///
/// * `table_seed` - Base RNG seed of the table
/// * `round_no` - Round number (1-based, counts every `start_round`)
pub fn derive_dealing_seed(table_seed: u64, round_no: u32) -> u64 {
    table_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(2) // Offset to distinguish from bot seeds
}

/// Derive a seed for a bot seated at `seat`.
///
/// Same table + seat = same decisions, different seats diverge.
pub fn derive_bot_seed(table_seed: u64, seat: usize) -> u64 {
    table_seed
        .wrapping_add((seat as u64).wrapping_mul(100))
        .wrapping_add(1)
}

/// Seed for the next game after a reset, so a reset table does not replay
/// the previous game's deals.
pub fn derive_next_game_seed(game_seed: u64) -> u64 {
    game_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(3)
}
