//! Copying recurring expenses and materializing ledgers.
//!
//! A recurring fixed expense reaches a month in one of two ways:
//!
//! - carry-forward: a ledger created after the expense copies every active
//!   recurring expense of the ledger right before it;
//! - broadcast: an expense registered after some later ledgers already exist
//!   is copied into each of them at registration time.
//!
//! All functions take the open transaction of the calling operation and are
//! never committed on their own.

use sea_orm::DatabaseTransaction;

use crate::{Entry, Ledger, LedgerRange, Period, ResultEngine, store};

/// Copy the active recurring expenses of the previous month into `ledger`.
///
/// Must run exactly once per ledger, right after it is inserted: running it
/// twice duplicates the copies. Returns the number of entries created.
pub(super) async fn carry_forward(db_tx: &DatabaseTransaction, ledger: &Ledger) -> ResultEngine<usize> {
    let previous = ledger.period.previous();
    let Some(source) = store::find_ledger(db_tx, previous).await? else {
        tracing::debug!(period = %ledger.period, "no previous ledger, nothing to carry forward");
        return Ok(0);
    };

    let mut copied = 0;
    for entry in store::entries_of(db_tx, source.id)
        .await?
        .into_iter()
        .filter(Entry::propagates)
    {
        let copy = entry.recurring_copy(ledger.id, ledger.period.rebase(entry.date));
        store::insert_entry(db_tx, &copy).await?;
        copied += 1;
    }

    tracing::debug!(from = %previous, to = %ledger.period, copied, "carried recurring expenses forward");
    Ok(copied)
}

/// Copy a freshly registered recurring expense into every ledger after
/// `period`. Returns the number of copies.
pub(super) async fn broadcast(
    db_tx: &DatabaseTransaction,
    entry: &Entry,
    period: Period,
) -> ResultEngine<usize> {
    let later = store::list_ledgers(db_tx, LedgerRange::After(period)).await?;
    for ledger in &later {
        let copy = entry.recurring_copy(ledger.id, ledger.period.rebase(entry.date));
        store::insert_entry(db_tx, &copy).await?;
    }

    tracing::debug!(entry = %entry.id, from = %period, copies = later.len(), "broadcast recurring expense");
    Ok(later.len())
}

/// Insert a new ledger for `period` and carry the previous month forward
/// into it.
pub(super) async fn open_ledger(db_tx: &DatabaseTransaction, period: Period) -> ResultEngine<Ledger> {
    let ledger = Ledger::new(period);
    store::insert_ledger(db_tx, &ledger).await?;
    carry_forward(db_tx, &ledger).await?;
    Ok(ledger)
}

/// Find the ledger of `period`, creating it (with carry-forward) when
/// missing. The flag is `true` when the ledger was created.
///
/// A concurrent creation of the same period surfaces as
/// [`EngineError::ExistingKey`](crate::EngineError::ExistingKey) from the
/// unique index and aborts the whole transaction.
pub(super) async fn find_or_open_ledger(
    db_tx: &DatabaseTransaction,
    period: Period,
) -> ResultEngine<(Ledger, bool)> {
    match store::find_ledger(db_tx, period).await? {
        Some(ledger) => Ok((ledger, false)),
        None => Ok((open_ledger(db_tx, period).await?, true)),
    }
}
