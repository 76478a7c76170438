//! Command structs for engine operations.
//!
//! These types group parameters for write operations (register, edit,
//! terminate), keeping call sites readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EntryKind, Money, Period};

/// Register a new entry on an existing ledger.
///
/// The kind decides what else happens:
/// - `FixedExpense` is recurring and is broadcast to every later ledger.
/// - `VariableExpense` with `installments(n)` is split into `n` monthly
///   installments.
/// - `Income` and plain `VariableExpense` touch only the target ledger.
#[derive(Clone, Debug)]
pub struct NewEntryCmd {
    pub ledger_id: Uuid,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub is_digital: bool,
    pub installments: Option<u32>,
}

impl NewEntryCmd {
    #[must_use]
    pub fn new(
        ledger_id: Uuid,
        kind: EntryKind,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            ledger_id,
            description: description.into(),
            amount,
            date,
            kind,
            is_digital: false,
            installments: None,
        }
    }

    #[must_use]
    pub fn income(
        ledger_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::new(ledger_id, EntryKind::Income, description, amount, date)
    }

    #[must_use]
    pub fn fixed_expense(
        ledger_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::new(ledger_id, EntryKind::FixedExpense, description, amount, date)
    }

    #[must_use]
    pub fn variable_expense(
        ledger_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self::new(
            ledger_id,
            EntryKind::VariableExpense,
            description,
            amount,
            date,
        )
    }

    /// Book the entry on the digital account instead of physical cash.
    #[must_use]
    pub fn digital(mut self, is_digital: bool) -> Self {
        self.is_digital = is_digital;
        self
    }

    /// Split a variable expense into `count` monthly installments of `amount`
    /// each.
    #[must_use]
    pub fn installments(mut self, count: u32) -> Self {
        self.installments = Some(count);
        self
    }
}

/// How far a termination reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Termination {
    /// Recurring: mark the entry inactive, keep copies already made in later
    /// ledgers. Installments: delete the later installments.
    #[default]
    Stop,
    /// Like `Stop`, and for recurring expenses also delete the copies of the
    /// same series in later ledgers.
    StopAndRetract,
}

/// Partial update of an entry. Unset fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub is_digital: Option<bool>,
    pub terminate: Option<Termination>,
}

impl EntryPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn digital(mut self, is_digital: bool) -> Self {
        self.is_digital = Some(is_digital);
        self
    }

    #[must_use]
    pub fn terminate(mut self, termination: Termination) -> Self {
        self.terminate = Some(termination);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.is_digital.is_none()
            && self.terminate.is_none()
    }
}

/// Which ledgers `list_ledgers` returns. Bounds are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LedgerRange {
    #[default]
    All,
    Before(Period),
    After(Period),
}
