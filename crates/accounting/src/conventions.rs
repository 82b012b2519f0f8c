//! Opt-in structural checks on journal lines.
//!
//! The balance engine itself is permissive: it sums whatever it is given. These
//! rules match what the bookkeeping backend enforces when an entry is saved, so
//! a caller can surface them before the round trip.

use thiserror::Error;

use crate::line::{JournalLine, LineSide};

/// Fewest lines a journal entry may have.
pub const MIN_LINES: usize = 2;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    #[error("a journal entry must have at least {} lines (found {count})", MIN_LINES)]
    TooFewLines { count: usize },

    #[error("line {} has both a debit and a credit amount", .index + 1)]
    BothSides { index: usize },

    #[error("line {} has neither a debit nor a credit amount", .index + 1)]
    NoAmount { index: usize },
}

/// Check line count and the one-side-per-line convention.
///
/// Reports the first violation in line order.
pub fn check_line_conventions(lines: &[JournalLine]) -> Result<(), LineError> {
    if lines.len() < MIN_LINES {
        return Err(LineError::TooFewLines { count: lines.len() });
    }

    for (index, line) in lines.iter().enumerate() {
        match line.side() {
            LineSide::Debit | LineSide::Credit => {}
            LineSide::Both => return Err(LineError::BothSides { index }),
            LineSide::Neither => return Err(LineError::NoAmount { index }),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;

    #[test]
    fn accepts_one_sided_lines() {
        let lines = [
            JournalLine::debit(Amount::from(100)),
            JournalLine::credit(Amount::from(60)),
            JournalLine::credit(Amount::from(40)),
        ];
        assert_eq!(check_line_conventions(&lines), Ok(()));
    }

    #[test]
    fn rejects_single_line() {
        let lines = [JournalLine::debit(Amount::from(1))];
        assert_eq!(
            check_line_conventions(&lines),
            Err(LineError::TooFewLines { count: 1 })
        );
    }

    #[test]
    fn reports_first_offending_line() {
        let lines = [
            JournalLine::debit(Amount::from(1)),
            JournalLine::blank(),
            JournalLine::from_inputs("1", "1"),
        ];
        let err = check_line_conventions(&lines).unwrap_err();
        assert_eq!(err, LineError::NoAmount { index: 1 });
        assert_eq!(err.to_string(), "line 2 has neither a debit nor a credit amount");
    }

    #[test]
    fn rejects_two_sided_line() {
        let lines = [JournalLine::from_inputs("5", "5"), JournalLine::credit(Amount::from(0))];
        assert_eq!(
            check_line_conventions(&lines),
            Err(LineError::BothSides { index: 0 })
        );
    }
}
