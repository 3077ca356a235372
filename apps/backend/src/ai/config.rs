//! Per-seat bot settings, as stored in a table's seat config.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::AppError;

/// Knobs every bot understands, plus whatever else the seat config carried.
///
/// ```json
/// {"seed": 12345, "declare_rate": 0.8, "style": "cautious"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Chance in `[0, 1]` of declaring when a declaration is legal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declare_rate: Option<f64>,

    /// Bot-specific keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl AiConfig {
    /// Parse a seat config. `None` and `null` both mean "no settings".
    ///
    /// Unlike unknown keys, a mistyped known key or a rate outside `[0, 1]`
    /// is rejected so a typo does not silently produce a default bot.
    pub fn from_json(config: Option<&JsonValue>) -> Result<Self, AppError> {
        let config: Self = match config {
            None | Some(JsonValue::Null) => return Ok(Self::default()),
            Some(json) => serde_json::from_value(json.clone())
                .map_err(|e| AppError::bad_request(format!("Invalid bot config: {e}")))?,
        };
        if let Some(rate) = config.declare_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(AppError::bad_request(format!(
                    "declare_rate must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(config)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn declare_rate(&self) -> Option<f64> {
        self.declare_rate
    }

    /// A bot-specific key not covered by the typed fields.
    pub fn extra(&self, key: &str) -> Option<&JsonValue> {
        self.extra.get(key)
    }
}
