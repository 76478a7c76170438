use uuid::Uuid;

use crate::{
    LedgerRange, LedgerSummary, Money, Period, ResultEngine, Totals, store, summary,
};

use super::Engine;

impl Engine {
    /// Income and expense totals of one ledger.
    pub async fn totals(&self, ledger_id: Uuid) -> ResultEngine<Totals> {
        let ledger = store::require_ledger(&self.database, ledger_id).await?;
        let entries = store::entries_of(&self.database, ledger.id).await?;
        Totals::of(&entries)
    }

    /// Sum of `income - expense` over every ledger strictly before `period`.
    ///
    /// Returns `None` when there is no earlier ledger at all, so callers can
    /// tell "no history" from "history that nets to zero".
    pub async fn opening_balance(&self, period: Period) -> ResultEngine<Option<Money>> {
        let range = LedgerRange::Before(period);
        if store::count_ledgers(&self.database, range).await? == 0 {
            return Ok(None);
        }
        let entries = store::entries_in_range(&self.database, range).await?;
        Totals::of(&entries)?.net().map(Some)
    }

    /// Opening balance (zero when absent) plus the ledger's own net.
    pub async fn closing_balance(&self, ledger_id: Uuid) -> ResultEngine<Money> {
        let ledger = store::require_ledger(&self.database, ledger_id).await?;
        let entries = store::entries_of(&self.database, ledger.id).await?;
        let opening = self.opening_balance(ledger.period).await?;
        summary::closing_balance(opening, Totals::of(&entries)?)
    }

    /// Entries, totals per account and balances of one ledger.
    pub async fn ledger_summary(&self, ledger_id: Uuid) -> ResultEngine<LedgerSummary> {
        let ledger = store::require_ledger(&self.database, ledger_id).await?;
        let entries = store::entries_of(&self.database, ledger.id).await?;
        let opening = self.opening_balance(ledger.period).await?;
        LedgerSummary::new(ledger, entries, opening)
    }
}
