use serde::{Deserialize, Serialize};

use ledgerkit_core::ValueObject;

use crate::amount::Amount;

/// One row of a journal entry as entered by the user.
///
/// By convention only one of `debit`/`credit` is populated, but the engine does
/// not rely on it; see [`crate::conventions`] for the opt-in check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    #[serde(default)]
    pub debit: Amount,
    #[serde(default)]
    pub credit: Amount,
    /// Account code selected on the row, if any. Ignored by balancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValueObject for JournalLine {}

/// Which side(s) of the entry a line contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    Debit,
    Credit,
    Both,
    Neither,
}

impl JournalLine {
    /// A freshly appended row: both amounts empty.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn debit(amount: Amount) -> Self {
        Self {
            debit: amount,
            ..Self::default()
        }
    }

    pub fn credit(amount: Amount) -> Self {
        Self {
            credit: amount,
            ..Self::default()
        }
    }

    /// Build a line from raw form inputs; unreadable values count as zero.
    pub fn from_inputs(debit: &str, credit: &str) -> Self {
        Self {
            debit: Amount::parse_lenient(debit),
            credit: Amount::parse_lenient(credit),
            ..Self::default()
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn side(&self) -> LineSide {
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, true) => LineSide::Debit,
            (true, false) => LineSide::Credit,
            (false, false) => LineSide::Both,
            (true, true) => LineSide::Neither,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_classifies_populated_amounts() {
        assert_eq!(JournalLine::debit(Amount::from(5)).side(), LineSide::Debit);
        assert_eq!(JournalLine::credit(Amount::from(5)).side(), LineSide::Credit);
        assert_eq!(JournalLine::from_inputs("1", "2").side(), LineSide::Both);
        assert_eq!(JournalLine::blank().side(), LineSide::Neither);
    }

    #[test]
    fn from_inputs_is_lenient() {
        let line = JournalLine::from_inputs("abc", "12.5");
        assert_eq!(line.debit, Amount::ZERO);
        assert_eq!(line.credit, "12.5".parse().unwrap());
    }

    #[test]
    fn deserialises_with_missing_fields() {
        let line: JournalLine = serde_json::from_str(r#"{"credit": "40", "account": "1000"}"#).unwrap();
        assert_eq!(line.debit, Amount::ZERO);
        assert_eq!(line.credit, Amount::from(40));
        assert_eq!(line.account.as_deref(), Some("1000"));
    }
}
