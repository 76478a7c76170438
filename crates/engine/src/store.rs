//! Data-level access to the `ledgers` and `entries` tables.
//!
//! Every function is generic over [`ConnectionTrait`] so it runs unchanged
//! on the pooled connection (reads) or inside an open `DatabaseTransaction`
//! (writes). Nothing here checks permissions or business rules.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    EngineError, Entry, Ledger, LedgerRange, Period, ResultEngine, entries, ledgers,
};

fn before(period: Period) -> Condition {
    let month_index = period.month().index() as i32;
    Condition::any()
        .add(ledgers::Column::Year.lt(period.year()))
        .add(
            Condition::all()
                .add(ledgers::Column::Year.eq(period.year()))
                .add(ledgers::Column::MonthIndex.lt(month_index)),
        )
}

fn after(period: Period) -> Condition {
    let month_index = period.month().index() as i32;
    Condition::any()
        .add(ledgers::Column::Year.gt(period.year()))
        .add(
            Condition::all()
                .add(ledgers::Column::Year.eq(period.year()))
                .add(ledgers::Column::MonthIndex.gt(month_index)),
        )
}

fn range_condition(range: LedgerRange) -> Condition {
    match range {
        LedgerRange::All => Condition::all(),
        LedgerRange::Before(period) => before(period),
        LedgerRange::After(period) => after(period),
    }
}

pub(crate) async fn find_ledger<C: ConnectionTrait>(
    db: &C,
    period: Period,
) -> ResultEngine<Option<Ledger>> {
    ledgers::Entity::find()
        .filter(ledgers::Column::Year.eq(period.year()))
        .filter(ledgers::Column::MonthIndex.eq(period.month().index() as i32))
        .one(db)
        .await?
        .map(Ledger::try_from)
        .transpose()
}

pub(crate) async fn require_ledger<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<Ledger> {
    ledgers::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(Ledger::try_from)
        .transpose()?
        .ok_or_else(|| EngineError::KeyNotFound(format!("ledger {id}")))
}

pub(crate) async fn insert_ledger<C: ConnectionTrait>(db: &C, ledger: &Ledger) -> ResultEngine<()> {
    ledgers::ActiveModel::from(ledger)
        .insert(db)
        .await
        .map_err(|err| EngineError::from_insert(err, format!("ledger {}", ledger.period)))?;
    Ok(())
}

/// Delete a ledger and all of its entries. Returns the number of entries
/// removed.
pub(crate) async fn delete_ledger<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<u64> {
    let removed = entries::Entity::delete_many()
        .filter(entries::Column::LedgerId.eq(id.to_string()))
        .exec(db)
        .await?
        .rows_affected;
    ledgers::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    Ok(removed)
}

/// Ledgers in `range`, in chronological order.
pub(crate) async fn list_ledgers<C: ConnectionTrait>(
    db: &C,
    range: LedgerRange,
) -> ResultEngine<Vec<Ledger>> {
    ledgers::Entity::find()
        .filter(range_condition(range))
        .order_by_asc(ledgers::Column::Year)
        .order_by_asc(ledgers::Column::MonthIndex)
        .all(db)
        .await?
        .into_iter()
        .map(Ledger::try_from)
        .collect()
}

pub(crate) async fn count_ledgers<C: ConnectionTrait>(
    db: &C,
    range: LedgerRange,
) -> ResultEngine<u64> {
    Ok(ledgers::Entity::find()
        .filter(range_condition(range))
        .count(db)
        .await?)
}

pub(crate) async fn entries_of<C: ConnectionTrait>(
    db: &C,
    ledger_id: Uuid,
) -> ResultEngine<Vec<Entry>> {
    entries::Entity::find()
        .filter(entries::Column::LedgerId.eq(ledger_id.to_string()))
        .order_by_asc(entries::Column::OccurredAt)
        .order_by_asc(entries::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Entry::try_from)
        .collect()
}

/// Entries of every ledger in `range`.
pub(crate) async fn entries_in_range<C: ConnectionTrait>(
    db: &C,
    range: LedgerRange,
) -> ResultEngine<Vec<Entry>> {
    entries::Entity::find()
        .inner_join(ledgers::Entity)
        .filter(range_condition(range))
        .all(db)
        .await?
        .into_iter()
        .map(Entry::try_from)
        .collect()
}

pub(crate) async fn require_entry<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<Entry> {
    entries::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(Entry::try_from)
        .transpose()?
        .ok_or_else(|| EngineError::KeyNotFound(format!("entry {id}")))
}

pub(crate) async fn insert_entry<C: ConnectionTrait>(db: &C, entry: &Entry) -> ResultEngine<()> {
    entries::ActiveModel::from(entry)
        .insert(db)
        .await
        .map_err(|err| EngineError::from_insert(err, format!("entry {}", entry.id)))?;
    Ok(())
}

/// Persist every field of `entry` over the stored row with the same id.
pub(crate) async fn update_entry<C: ConnectionTrait>(db: &C, entry: &Entry) -> ResultEngine<()> {
    entries::ActiveModel::from(entry).update(db).await?;
    Ok(())
}

pub(crate) async fn delete_entry<C: ConnectionTrait>(db: &C, id: Uuid) -> ResultEngine<bool> {
    let result = entries::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

pub(crate) async fn entries_in_group<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
) -> ResultEngine<Vec<Entry>> {
    entries::Entity::find()
        .filter(entries::Column::GroupId.eq(group_id.to_string()))
        .order_by_asc(entries::Column::InstallmentIndex)
        .all(db)
        .await?
        .into_iter()
        .map(Entry::try_from)
        .collect()
}

/// Delete the installments of `group_id` whose index is greater than `index`.
pub(crate) async fn delete_later_installments<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    index: u32,
) -> ResultEngine<u64> {
    Ok(entries::Entity::delete_many()
        .filter(entries::Column::GroupId.eq(group_id.to_string()))
        .filter(entries::Column::InstallmentIndex.gt(index as i32))
        .exec(db)
        .await?
        .rows_affected)
}

pub(crate) async fn delete_group<C: ConnectionTrait>(db: &C, group_id: Uuid) -> ResultEngine<u64> {
    Ok(entries::Entity::delete_many()
        .filter(entries::Column::GroupId.eq(group_id.to_string()))
        .exec(db)
        .await?
        .rows_affected)
}

/// Delete the copies of a recurring series living in ledgers after `period`.
pub(crate) async fn delete_series_after<C: ConnectionTrait>(
    db: &C,
    series_id: Uuid,
    period: Period,
) -> ResultEngine<u64> {
    let later: Vec<String> = ledgers::Entity::find()
        .select_only()
        .column(ledgers::Column::Id)
        .filter(after(period))
        .into_tuple()
        .all(db)
        .await?;
    if later.is_empty() {
        return Ok(0);
    }
    Ok(entries::Entity::delete_many()
        .filter(entries::Column::SeriesId.eq(series_id.to_string()))
        .filter(entries::Column::LedgerId.is_in(later))
        .exec(db)
        .await?
        .rows_affected)
}
