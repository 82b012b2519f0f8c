//! Engine configuration (environment-driven, with logged fallbacks).

use serde::Deserialize;

use crate::amount::Amount;
use crate::balance::{BalanceEngine, TOLERANCE};

pub const TOLERANCE_ENV: &str = "LEDGERKIT_BALANCE_TOLERANCE";
pub const STRICT_LINES_ENV: &str = "LEDGERKIT_STRICT_LINES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest difference still treated as balanced.
    pub tolerance: Amount,
    /// Also enforce the line conventions (two or more lines, one side each)
    /// before submission.
    pub strict_lines: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            strict_lines: false,
        }
    }
}

impl EngineConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unusable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(TOLERANCE_ENV) {
            match raw.parse::<Amount>() {
                Ok(tolerance) => config.tolerance = tolerance,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "{TOLERANCE_ENV} is not a valid amount; using default {TOLERANCE}"
                ),
            }
        }

        if let Some(raw) = lookup(STRICT_LINES_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.strict_lines = flag,
                None => tracing::warn!(
                    value = %raw,
                    "{STRICT_LINES_ENV} is not a boolean; leaving strict line checks off"
                ),
            }
        }

        config
    }

    pub fn engine(&self) -> BalanceEngine {
        BalanceEngine::with_tolerance(self.tolerance)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
