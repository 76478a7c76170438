//! Totals and balances of a ledger.

use serde::Serialize;

use crate::{EngineError, Entry, Ledger, Money, ResultEngine};

/// Income and expense sums over a set of entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("total out of range".to_string())
}

impl Totals {
    /// Sum `entries`: income on one side, fixed and variable expenses on the
    /// other.
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> ResultEngine<Self> {
        entries
            .into_iter()
            .try_fold(Self::default(), |mut totals, entry| {
                let side = if entry.kind.is_expense() {
                    &mut totals.expense
                } else {
                    &mut totals.income
                };
                *side = side.checked_add(entry.amount).ok_or_else(overflow)?;
                Ok(totals)
            })
    }

    /// `income - expense`.
    pub fn net(&self) -> ResultEngine<Money> {
        self.income.checked_sub(self.expense).ok_or_else(overflow)
    }
}

/// Everything needed to render one month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub ledger: Ledger,
    pub entries: Vec<Entry>,
    pub totals: Totals,
    /// Physical cash only.
    pub physical: Totals,
    /// Digital account only.
    pub digital: Totals,
    /// `None` when no earlier ledger exists, which is not the same as a zero
    /// balance.
    pub opening_balance: Option<Money>,
    pub closing_balance: Money,
}

impl LedgerSummary {
    pub(crate) fn new(
        ledger: Ledger,
        entries: Vec<Entry>,
        opening_balance: Option<Money>,
    ) -> ResultEngine<Self> {
        let totals = Totals::of(&entries)?;
        let physical = Totals::of(entries.iter().filter(|e| !e.is_digital))?;
        let digital = Totals::of(entries.iter().filter(|e| e.is_digital))?;
        Ok(Self {
            closing_balance: closing_balance(opening_balance, totals)?,
            ledger,
            entries,
            totals,
            physical,
            digital,
            opening_balance,
        })
    }
}

/// Opening balance (zero when absent) plus the month's net.
pub fn closing_balance(opening_balance: Option<Money>, totals: Totals) -> ResultEngine<Money> {
    opening_balance
        .unwrap_or(Money::ZERO)
        .checked_add(totals.net()?)
        .ok_or_else(overflow)
}
