//! Accounting module (double-entry balance checking for journal entries).
//!
//! Pure domain logic only: no IO, no rendering, no persistence concerns. The
//! caller owns the line list and asks for totals or a submission verdict.

pub mod amount;
pub mod balance;
pub mod config;
pub mod conventions;
pub mod draft;
pub mod line;

pub use amount::Amount;
pub use balance::{
    BalanceEngine, BalanceResult, BalanceStatus, TOLERANCE, ValidationError, compute_totals,
    validate_for_submission,
};
pub use config::EngineConfig;
pub use conventions::{LineError, MIN_LINES, check_line_conventions};
pub use draft::{
    DraftCommand, DraftError, DraftEvent, JournalDraft, SubmissionError, check_submission,
};
pub use line::{JournalLine, LineSide};
