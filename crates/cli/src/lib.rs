//! Balance report for journal lines supplied as JSON.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use ledgerkit_accounting::{Amount, BalanceStatus, EngineConfig, JournalLine, check_submission};

/// Accepted input shapes: a bare array of lines, or an object with `lines`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Lines(Vec<JournalLine>),
    Entry { lines: Vec<JournalLine> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub lines: usize,
    pub total_debit: Amount,
    pub total_credit: Amount,
    pub difference: Amount,
    pub balanced: bool,
    pub status: BalanceStatus,
    /// Why the entry would be rejected for submission, if it would be.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    pub fn accepted(&self) -> bool {
        self.error.is_none()
    }
}

pub fn parse_lines(input: &str) -> anyhow::Result<Vec<JournalLine>> {
    let document: Document =
        serde_json::from_str(input).context("input is not a journal line list")?;
    Ok(match document {
        Document::Lines(lines) | Document::Entry { lines } => lines,
    })
}

/// Parse `input` and evaluate it as a submission under `config`.
pub fn check_document(input: &str, config: &EngineConfig) -> anyhow::Result<Report> {
    let lines = parse_lines(input)?;
    let totals = config.engine().compute_totals(&lines);
    let error = check_submission(&lines, config).err().map(|e| e.to_string());

    tracing::info!(
        lines = lines.len(),
        total_debit = %totals.total_debit,
        total_credit = %totals.total_credit,
        balanced = totals.balanced,
        accepted = error.is_none(),
        "checked journal entry"
    );

    Ok(Report {
        lines: lines.len(),
        total_debit: totals.total_debit,
        total_credit: totals.total_credit,
        difference: totals.difference,
        balanced: totals.balanced,
        status: totals.status(),
        error,
    })
}
