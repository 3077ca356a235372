pub const CARDS_PER_DECK: usize = 54;
pub const MIN_PLAYERS: u8 = 2;
/// Point cards in one deck are worth 100 between them.
pub const POINTS_PER_DECK: u32 = 100;
pub const MAX_BOTTOM_MULTIPLIER: u32 = 16;

/// Smallest acceptable auto-derived bottom for a table of `num_players`.
fn min_bottom(num_players: u8) -> f64 {
    6.0 - f64::from(num_players) / 2.0
}

/// Bottom size when the settings leave it unset.
///
/// Start from the cards left over after an even deal and add whole rounds
/// of the table until the bottom is big enough to matter.
pub fn derive_bottom_size(num_decks: u8, num_players: u8) -> u16 {
    let total = CARDS_PER_DECK as u16 * u16::from(num_decks);
    let players = u16::from(num_players);
    let mut bottom = total % players;
    while f64::from(bottom) < min_bottom(num_players) {
        bottom += players;
    }
    bottom
}

/// Level change for the round winners.
///
/// A shutout (`points == 0`) is worth three levels; otherwise one level per
/// half-cutoff of distance from the cutoff.
pub fn level_change(points: u32, cutoff: u32, multiplier: u32) -> u32 {
    if points == 0 {
        return multiplier.saturating_mul(3);
    }
    if cutoff == 0 {
        return 0;
    }
    let distance = (i64::from(points) - i64::from(cutoff)).unsigned_abs();
    let levels = u32::try_from(distance * 2 / u64::from(cutoff)).unwrap_or(u32::MAX);
    multiplier.saturating_mul(levels)
}
