use std::env;
use std::str::FromStr;

use crate::domain::Settings;
use crate::error::AppError;

/// Settings new tables start with, read from `ZPY_*` environment variables.
///
/// Unset variables fall back to [`Settings::default`]; a set but malformed
/// variable is a configuration error rather than a silent default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDefaults {
    pub settings: Settings,
}

impl TableDefaults {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`TableDefaults::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Settings::default();
        let settings = Settings {
            num_decks: parse_or(&lookup, "ZPY_NUM_DECKS", base.num_decks)?,
            num_players: parse_or(&lookup, "ZPY_NUM_PLAYERS", base.num_players)?,
            wraparound: parse_or(&lookup, "ZPY_WRAPAROUND", base.wraparound)?,
            winners_declare: parse_or(&lookup, "ZPY_WINNERS_DECLARE", base.winners_declare)?,
            team_size: parse_opt(&lookup, "ZPY_TEAM_SIZE")?,
            bottom_size: parse_opt(&lookup, "ZPY_BOTTOM_SIZE")?,
            cutoff_per_deck: parse_or(&lookup, "ZPY_CUTOFF_PER_DECK", base.cutoff_per_deck)?,
            bottom_multiplier: parse_or(&lookup, "ZPY_BOTTOM_MULTIPLIER", base.bottom_multiplier)?,
        };
        settings
            .validate()
            .map_err(|e| AppError::config(format!("Invalid table defaults: {e}")))?;
        Ok(Self { settings })
    }
}

fn parse_opt<T, F>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::config(format!("{name} has an invalid value: '{raw}'"))),
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, name)?.unwrap_or(default))
}
