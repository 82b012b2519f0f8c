//! Debit/credit totals and the balanced verdict for a set of journal lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;
use crate::line::JournalLine;

/// Largest debit/credit difference still treated as balanced (0.001).
pub const TOLERANCE: Amount = Amount::from_decimal_unchecked(Decimal::from_parts(1, 0, 0, false, 3));

/// Totals derived from a line list. Never stored; recompute on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceResult {
    pub total_debit: Amount,
    pub total_credit: Amount,
    /// Always `|total_debit - total_credit|`.
    pub difference: Amount,
    pub balanced: bool,
}

/// Display verdict for a [`BalanceResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Balanced,
    OutOfBalance,
}

impl BalanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            BalanceStatus::Balanced => "Balanced",
            BalanceStatus::OutOfBalance => "Out of Balance",
        }
    }
}

impl core::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl BalanceResult {
    pub fn status(&self) -> BalanceStatus {
        if self.balanced {
            BalanceStatus::Balanced
        } else {
            BalanceStatus::OutOfBalance
        }
    }
}

/// Reasons a journal entry may not be submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "journal entry is not balanced: debits {total_debit} vs credits {total_credit} (difference {difference})"
    )]
    Unbalanced {
        total_debit: Amount,
        total_credit: Amount,
        difference: Amount,
    },

    #[error("journal entry cannot be empty: add at least one debit and credit amount")]
    Empty,
}

/// Stateless balance checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceEngine {
    tolerance: Amount,
}

impl Default for BalanceEngine {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }
}

impl BalanceEngine {
    pub fn with_tolerance(tolerance: Amount) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Amount {
        self.tolerance
    }

    /// Sum both columns and compare them. Pure; never fails.
    pub fn compute_totals(&self, lines: &[JournalLine]) -> BalanceResult {
        let total_debit: Amount = lines.iter().map(|l| l.debit).sum();
        let total_credit: Amount = lines.iter().map(|l| l.credit).sum();
        let difference = total_debit.abs_diff(total_credit);

        BalanceResult {
            total_debit,
            total_credit,
            difference,
            balanced: difference <= self.tolerance,
        }
    }

    /// Pre-submission gate: the entry must balance and carry a nonzero total.
    pub fn validate_for_submission(&self, lines: &[JournalLine]) -> Result<(), ValidationError> {
        let totals = self.compute_totals(lines);

        if !totals.balanced {
            tracing::debug!(
                total_debit = %totals.total_debit,
                total_credit = %totals.total_credit,
                difference = %totals.difference,
                "rejecting unbalanced journal entry"
            );
            return Err(ValidationError::Unbalanced {
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
                difference: totals.difference,
            });
        }

        if totals.total_debit.is_zero() {
            tracing::debug!(lines = lines.len(), "rejecting journal entry with zero total");
            return Err(ValidationError::Empty);
        }

        Ok(())
    }
}

/// [`BalanceEngine::compute_totals`] with the default tolerance.
pub fn compute_totals(lines: &[JournalLine]) -> BalanceResult {
    BalanceEngine::default().compute_totals(lines)
}

/// [`BalanceEngine::validate_for_submission`] with the default tolerance.
pub fn validate_for_submission(lines: &[JournalLine]) -> Result<(), ValidationError> {
    BalanceEngine::default().validate_for_submission(lines)
}
