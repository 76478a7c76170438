use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{EngineError, Ledger, LedgerRange, Period, ResultEngine, store};

use super::{Actor, Engine, propagation, with_tx};

impl Engine {
    /// Create the ledger of `period`.
    ///
    /// The active recurring fixed expenses of the previous month (if that
    /// ledger exists) are copied into the new ledger in the same
    /// transaction.
    pub async fn create_ledger(&self, actor: &Actor, period: Period) -> ResultEngine<Ledger> {
        actor.require_write()?;
        let ledger = with_tx!(self, |db_tx| {
            if store::find_ledger(&db_tx, period).await?.is_some() {
                return Err(EngineError::ExistingKey(format!("ledger {period}")));
            }
            propagation::open_ledger(&db_tx, period).await
        })?;

        tracing::info!(ledger = %ledger.id, period = %period, user = %actor.user_id, "ledger created");
        Ok(ledger)
    }

    /// Return the ledger with the given id.
    pub async fn ledger(&self, ledger_id: Uuid) -> ResultEngine<Ledger> {
        store::require_ledger(&self.database, ledger_id).await
    }

    /// Return the ledger of `period`, if one exists.
    pub async fn ledger_for(&self, period: Period) -> ResultEngine<Option<Ledger>> {
        store::find_ledger(&self.database, period).await
    }

    /// Ledgers in `range`, oldest first.
    pub async fn list_ledgers(&self, range: LedgerRange) -> ResultEngine<Vec<Ledger>> {
        store::list_ledgers(&self.database, range).await
    }

    /// Delete a ledger together with all of its entries.
    ///
    /// Later ledgers keep the copies they already received.
    pub async fn delete_ledger(&self, actor: &Actor, ledger_id: Uuid) -> ResultEngine<u64> {
        actor.require_write()?;
        let (ledger, removed) = with_tx!(self, |db_tx| {
            let ledger = store::require_ledger(&db_tx, ledger_id).await?;
            let removed = store::delete_ledger(&db_tx, ledger.id).await?;
            Ok::<_, EngineError>((ledger, removed))
        })?;

        tracing::info!(
            ledger = %ledger.id,
            period = %ledger.period,
            entries = removed,
            user = %actor.user_id,
            "ledger deleted"
        );
        Ok(removed)
    }
}
