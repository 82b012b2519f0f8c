//! The editable line set behind a journal entry form.
//!
//! `JournalDraft` is owned by the caller and changed only through commands, so
//! every edit is checked against the two-line floor before it lands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ledgerkit_core::{Aggregate, AggregateRoot};

use crate::balance::{BalanceEngine, BalanceResult, ValidationError};
use crate::config::EngineConfig;
use crate::conventions::{LineError, MIN_LINES, check_line_conventions};
use crate::line::JournalLine;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    #[error("a journal entry must have at least {minimum} lines (got {count})")]
    TooFewLines { count: usize, minimum: usize },

    #[error("a journal entry must have at least {minimum} lines ({remaining} would remain)")]
    BelowMinimumLines { remaining: usize, minimum: usize },

    #[error("no line at position {index} (draft has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
}

/// Why a draft may not be submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Lines(#[from] LineError),

    #[error(transparent)]
    Balance(#[from] ValidationError),
}

/// Submission gate for any line list: line conventions when
/// `config.strict_lines` is set, then the balance check.
pub fn check_submission(
    lines: &[JournalLine],
    config: &EngineConfig,
) -> Result<BalanceResult, SubmissionError> {
    if config.strict_lines {
        check_line_conventions(lines)?;
    }
    let engine = config.engine();
    engine.validate_for_submission(lines)?;
    Ok(engine.compute_totals(lines))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftCommand {
    /// Append a blank line.
    AddLine,
    RemoveLine { index: usize },
    EditLine { index: usize, line: JournalLine },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftEvent {
    LineAdded { line: JournalLine },
    LineRemoved { index: usize, line: JournalLine },
    LineEdited { index: usize, line: JournalLine },
}

/// Aggregate root: the ordered lines of an entry being edited.
///
/// Invariant: always holds at least [`MIN_LINES`] lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    lines: Vec<JournalLine>,
    version: u64,
}

impl Default for JournalDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalDraft {
    /// A fresh form: two blank lines.
    pub fn new() -> Self {
        Self {
            lines: vec![JournalLine::blank(); MIN_LINES],
            version: 0,
        }
    }

    /// Start from existing lines (e.g. an entry reopened for editing).
    pub fn from_lines(lines: Vec<JournalLine>) -> Result<Self, DraftError> {
        if lines.len() < MIN_LINES {
            return Err(DraftError::TooFewLines {
                count: lines.len(),
                minimum: MIN_LINES,
            });
        }
        Ok(Self { lines, version: 0 })
    }

    pub fn lines(&self) -> &[JournalLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a blank line; returns its position.
    pub fn add_line(&mut self) -> usize {
        self.apply(&DraftEvent::LineAdded {
            line: JournalLine::blank(),
        });
        self.lines.len() - 1
    }

    /// Remove the line at `index`. Rejected, leaving the draft unchanged, when
    /// it would drop the draft below [`MIN_LINES`].
    pub fn remove_line(&mut self, index: usize) -> Result<JournalLine, DraftError> {
        let events = self.execute(&DraftCommand::RemoveLine { index })?;
        let removed = events.into_iter().find_map(|event| match event {
            DraftEvent::LineRemoved { line, .. } => Some(line),
            _ => None,
        });
        Ok(removed.unwrap_or_default())
    }

    pub fn edit_line(&mut self, index: usize, line: JournalLine) -> Result<(), DraftError> {
        self.execute(&DraftCommand::EditLine { index, line })?;
        Ok(())
    }

    pub fn totals(&self, engine: &BalanceEngine) -> BalanceResult {
        engine.compute_totals(&self.lines)
    }

    /// Gate before the entry is sent on: line conventions (when configured),
    /// then balance. Returns the totals on success for display.
    pub fn check_submission(&self, config: &EngineConfig) -> Result<BalanceResult, SubmissionError> {
        check_submission(&self.lines, config)
    }

    fn ensure_index(&self, index: usize) -> Result<(), DraftError> {
        if index >= self.lines.len() {
            return Err(DraftError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}

impl AggregateRoot for JournalDraft {
    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for JournalDraft {
    type Command = DraftCommand;
    type Event = DraftEvent;
    type Error = DraftError;

    /// Events that would break the line floor or point past the end are
    /// ignored and do not bump the version.
    fn apply(&mut self, event: &Self::Event) {
        match event {
            DraftEvent::LineAdded { line } => self.lines.push(line.clone()),
            DraftEvent::LineRemoved { index, .. } => {
                if *index >= self.lines.len() || self.lines.len() <= MIN_LINES {
                    tracing::debug!(index, lines = self.lines.len(), "ignoring LineRemoved");
                    return;
                }
                self.lines.remove(*index);
            }
            DraftEvent::LineEdited { index, line } => match self.lines.get_mut(*index) {
                Some(slot) => *slot = line.clone(),
                None => {
                    tracing::debug!(index, lines = self.lines.len(), "ignoring LineEdited");
                    return;
                }
            },
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DraftCommand::AddLine => Ok(vec![DraftEvent::LineAdded {
                line: JournalLine::blank(),
            }]),
            DraftCommand::RemoveLine { index } => {
                self.ensure_index(*index)?;
                if self.lines.len() <= MIN_LINES {
                    tracing::debug!(
                        index,
                        lines = self.lines.len(),
                        "refusing to remove journal line below minimum"
                    );
                    return Err(DraftError::BelowMinimumLines {
                        remaining: self.lines.len() - 1,
                        minimum: MIN_LINES,
                    });
                }
                Ok(vec![DraftEvent::LineRemoved {
                    index: *index,
                    line: self.lines[*index].clone(),
                }])
            }
            DraftCommand::EditLine { index, line } => {
                self.ensure_index(*index)?;
                Ok(vec![DraftEvent::LineEdited {
                    index: *index,
                    line: line.clone(),
                }])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use proptest::prelude::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn new_draft_has_two_blank_lines() {
        let draft = JournalDraft::new();
        assert_eq!(draft.lines(), &[JournalLine::blank(), JournalLine::blank()]);
        assert_eq!(draft.version(), 0);
    }

    #[test]
    fn from_lines_enforces_floor() {
        let err = JournalDraft::from_lines(vec![JournalLine::blank()]).unwrap_err();
        assert_eq!(
            err,
            DraftError::TooFewLines {
                count: 1,
                minimum: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "a journal entry must have at least 2 lines (got 1)"
        );
    }

    #[test]
    fn replayed_events_cannot_break_the_floor() {
        let mut draft = JournalDraft::new();
        let removal = DraftEvent::LineRemoved {
            index: 0,
            line: JournalLine::blank(),
        };
        draft.apply(&removal);
        draft.apply(&removal);
        assert_eq!(draft.len(), MIN_LINES);

        draft.apply(&DraftEvent::LineEdited {
            index: 3,
            line: JournalLine::debit(amt("1")),
        });
        draft.apply(&DraftEvent::LineRemoved {
            index: 9,
            line: JournalLine::blank(),
        });
        assert_eq!(draft, JournalDraft::new());
        assert_eq!(draft.version(), 0);
    }

    #[test]
    fn replayed_removal_above_floor_applies() {
        let mut draft = JournalDraft::new();
        draft.add_line();
        draft.apply(&DraftEvent::LineRemoved {
            index: 2,
            line: JournalLine::blank(),
        });
        assert_eq!(draft.len(), MIN_LINES);
        assert_eq!(draft.version(), 2);
    }

    #[test]
    fn add_then_remove_line() {
        let mut draft = JournalDraft::new();
        let index = draft.add_line();
        assert_eq!(index, 2);
        draft
            .edit_line(index, JournalLine::credit(amt("3")))
            .unwrap();

        let removed = draft.remove_line(index).unwrap();
        assert_eq!(removed, JournalLine::credit(amt("3")));
        assert_eq!(draft.len(), 2);
        assert_eq!(draft.version(), 3);
    }

    #[test]
    fn removal_at_floor_is_rejected_and_leaves_draft_unchanged() {
        let mut draft = JournalDraft::new();
        draft.edit_line(0, JournalLine::debit(amt("10"))).unwrap();
        let before = draft.clone();

        let err = draft.remove_line(0).unwrap_err();
        assert_eq!(
            err,
            DraftError::BelowMinimumLines {
                remaining: 1,
                minimum: 2
            }
        );
        assert_eq!(draft, before);
    }

    #[test]
    fn out_of_range_edit_is_rejected() {
        let mut draft = JournalDraft::new();
        assert_eq!(
            draft.edit_line(5, JournalLine::blank()),
            Err(DraftError::LineOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            draft.remove_line(7),
            Err(DraftError::LineOutOfRange { index: 7, len: 2 })
        );
    }

    #[test]
    fn handle_does_not_mutate() {
        let draft = JournalDraft::new();
        let events = draft.handle(&DraftCommand::AddLine).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn submission_checks_balance() {
        let mut draft = JournalDraft::new();
        draft.edit_line(0, JournalLine::debit(amt("150"))).unwrap();
        draft.edit_line(1, JournalLine::credit(amt("100"))).unwrap();

        let err = draft.check_submission(&EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Balance(ValidationError::Unbalanced { .. })
        ));

        draft.edit_line(1, JournalLine::credit(amt("150"))).unwrap();
        let totals = draft.check_submission(&EngineConfig::default()).unwrap();
        assert!(totals.balanced);
        assert_eq!(totals.total_debit, amt("150"));
    }

    #[test]
    fn strict_submission_rejects_two_sided_lines() {
        let draft = JournalDraft::from_lines(vec![
            JournalLine::from_inputs("100", "100"),
            JournalLine::blank(),
        ])
        .unwrap();

        // Permissive mode only sees balanced, nonzero totals.
        assert!(draft.check_submission(&EngineConfig::default()).is_ok());

        let strict = EngineConfig {
            strict_lines: true,
            ..EngineConfig::default()
        };
        assert_eq!(
            draft.check_submission(&strict),
            Err(SubmissionError::Lines(LineError::BothSides { index: 0 }))
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Add), (0usize..6).prop_map(Op::Remove)]
    }

    proptest! {
        /// No sequence of adds and removes can take the draft below the floor.
        #[test]
        fn line_count_never_drops_below_minimum(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut draft = JournalDraft::new();
            for op in ops {
                match op {
                    Op::Add => {
                        draft.add_line();
                    }
                    Op::Remove(index) => {
                        let before = draft.clone();
                        if draft.remove_line(index).is_err() {
                            prop_assert_eq!(&draft, &before);
                        }
                    }
                }
                prop_assert!(draft.len() >= MIN_LINES);
            }
        }
    }
}
