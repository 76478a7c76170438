use chrono::{Datelike, Months, NaiveDate};
use sea_orm::{DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::{
    EngineError, Entry, EntryKind, EntryPatch, Installment, Ledger, Money, NewEntryCmd, Period,
    ResultEngine, Termination,
    entries::base_description,
    month::add_months,
    store,
    util::{ensure_installment_count, ensure_amount, normalize_description},
};

use super::{Actor, Engine, propagation, with_tx};

/// Date of installment 1 recovered from the remaining members of a group.
///
/// Later installments may have had their day clamped to a short month, so
/// the candidate with the largest day of month wins.
fn group_start(group: &[Entry]) -> Option<NaiveDate> {
    group
        .iter()
        .filter_map(|member| {
            let index = member.installment.map_or(1, |i| i.index);
            member.date.checked_sub_months(Months::new(index.saturating_sub(1)))
        })
        .max_by_key(|date| date.day())
}

/// What a registration wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    /// The registered entry, or every installment in order.
    pub entries: Vec<Entry>,
    /// Copies of a recurring expense made into later, existing ledgers.
    pub propagated: usize,
    /// Ledgers created to hold installments.
    pub created_ledgers: Vec<Ledger>,
}

impl Registration {
    /// The entry on the originating ledger.
    pub fn entry(&self) -> Option<&Entry> {
        self.entries.first()
    }
}

/// What a termination did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminationOutcome {
    pub entry: Entry,
    /// Later installments or later recurring copies deleted.
    pub removed: u64,
}

fn ensure_in_ledger(ledger: &Ledger, date: NaiveDate) -> ResultEngine<()> {
    if !ledger.period.contains(date) {
        return Err(EngineError::InvalidEntry(format!(
            "date {date} is outside ledger {}",
            ledger.period
        )));
    }
    Ok(())
}

/// Validated shape of an installment series, shared by registration and
/// rescheduling.
struct InstallmentPlan {
    group_id: Uuid,
    description: String,
    amount: Money,
    date: NaiveDate,
    is_digital: bool,
    count: u32,
}

impl Engine {
    /// Register an entry on an existing ledger.
    ///
    /// - `FixedExpense`: stored as recurring and active, then copied into
    ///   every ledger after the target one that already exists.
    /// - `VariableExpense` with installments: split into one entry per month
    ///   starting at the target ledger, creating missing ledgers on the way.
    /// - anything else: stored as is.
    ///
    /// Everything happens in one transaction.
    pub async fn register_entry(&self, actor: &Actor, cmd: NewEntryCmd) -> ResultEngine<Registration> {
        actor.require_write()?;
        let description = normalize_description(&cmd.description)?;
        ensure_amount(cmd.amount)?;
        match (cmd.kind, cmd.installments) {
            (EntryKind::VariableExpense, Some(count)) => ensure_installment_count(count)?,
            (_, Some(_)) => {
                return Err(EngineError::InvalidEntry(
                    "only variable expenses can be split in installments".to_string(),
                ));
            }
            (_, None) => {}
        }

        let registration = with_tx!(self, |db_tx| {
            let ledger = store::require_ledger(&db_tx, cmd.ledger_id).await?;
            ensure_in_ledger(&ledger, cmd.date)?;

            match (cmd.kind, cmd.installments) {
                (EntryKind::VariableExpense, Some(count)) => {
                    let plan = InstallmentPlan {
                        group_id: Uuid::new_v4(),
                        description,
                        amount: cmd.amount,
                        date: cmd.date,
                        is_digital: cmd.is_digital,
                        count,
                    };
                    self.split_installments(&db_tx, &ledger, &plan).await
                }
                (EntryKind::FixedExpense, _) => {
                    let mut entry = Entry::new(
                        ledger.id,
                        description,
                        cmd.amount,
                        cmd.date,
                        EntryKind::FixedExpense,
                        cmd.is_digital,
                    );
                    entry.is_recurring = true;
                    entry.series_id = Some(Uuid::new_v4());
                    store::insert_entry(&db_tx, &entry).await?;
                    let propagated = propagation::broadcast(&db_tx, &entry, ledger.period).await?;
                    Ok(Registration {
                        entries: vec![entry],
                        propagated,
                        created_ledgers: Vec::new(),
                    })
                }
                (kind, _) => {
                    let entry = Entry::new(
                        ledger.id,
                        description,
                        cmd.amount,
                        cmd.date,
                        kind,
                        cmd.is_digital,
                    );
                    store::insert_entry(&db_tx, &entry).await?;
                    Ok(Registration {
                        entries: vec![entry],
                        ..Registration::default()
                    })
                }
            }
        })?;

        tracing::info!(
            ledger = %cmd.ledger_id,
            kind = %cmd.kind,
            entries = registration.entries.len(),
            propagated = registration.propagated,
            created_ledgers = registration.created_ledgers.len(),
            user = %actor.user_id,
            "entry registered"
        );
        Ok(registration)
    }

    /// Create `plan.count` installments, the first on `origin` and each next
    /// one a calendar month later.
    async fn split_installments(
        &self,
        db_tx: &DatabaseTransaction,
        origin: &Ledger,
        plan: &InstallmentPlan,
    ) -> ResultEngine<Registration> {
        let mut registration = Registration::default();
        for i in 0..plan.count {
            let date = add_months(plan.date, i)?;
            let ledger = if i == 0 {
                origin.clone()
            } else {
                let (ledger, created) =
                    propagation::find_or_open_ledger(db_tx, Period::from_date(date)?).await?;
                if created {
                    registration.created_ledgers.push(ledger.clone());
                }
                ledger
            };

            let installment = Installment::new(plan.group_id, i + 1, plan.count)?;
            let mut entry = Entry::new(
                ledger.id,
                format!("{} {}", plan.description, installment.label()),
                plan.amount,
                date,
                EntryKind::VariableExpense,
                plan.is_digital,
            );
            entry.installment = Some(installment);
            store::insert_entry(db_tx, &entry).await?;
            registration.entries.push(entry);
        }
        Ok(registration)
    }

    /// Return the entry with the given id.
    pub async fn entry(&self, entry_id: Uuid) -> ResultEngine<Entry> {
        store::require_entry(&self.database, entry_id).await
    }

    /// Entries of a ledger ordered by date.
    pub async fn list_entries(&self, ledger_id: Uuid) -> ResultEngine<Vec<Entry>> {
        let ledger = store::require_ledger(&self.database, ledger_id).await?;
        store::entries_of(&self.database, ledger.id).await
    }

    /// Edit an entry and optionally terminate it.
    ///
    /// A new date must stay inside the month of the entry's ledger; moving an
    /// entry to another month is not an edit.
    pub async fn update_entry(
        &self,
        actor: &Actor,
        entry_id: Uuid,
        patch: EntryPatch,
    ) -> ResultEngine<Entry> {
        actor.require_write()?;
        let description = patch
            .description
            .as_deref()
            .map(normalize_description)
            .transpose()?;
        if let Some(amount) = patch.amount {
            ensure_amount(amount)?;
        }

        let entry = with_tx!(self, |db_tx| {
            let mut entry = store::require_entry(&db_tx, entry_id).await?;
            if patch.is_empty() {
                return Ok(entry);
            }
            let ledger = store::require_ledger(&db_tx, entry.ledger_id).await?;

            if let Some(description) = description {
                entry.description = description;
            }
            if let Some(amount) = patch.amount {
                entry.amount = amount;
            }
            if let Some(date) = patch.date {
                ensure_in_ledger(&ledger, date)?;
                entry.date = date;
            }
            if let Some(is_digital) = patch.is_digital {
                entry.is_digital = is_digital;
            }
            store::update_entry(&db_tx, &entry).await?;

            if let Some(termination) = patch.terminate {
                self.terminate_in_tx(&db_tx, &mut entry, &ledger, termination)
                    .await?;
            }
            Ok::<_, EngineError>(entry)
        })?;

        tracing::info!(entry = %entry.id, user = %actor.user_id, "entry updated");
        Ok(entry)
    }

    /// Stop a recurring expense or an installment series at this entry.
    ///
    /// - recurring fixed expense: the entry is marked inactive so it is no
    ///   longer carried forward. With [`Termination::StopAndRetract`] the
    ///   copies of the same series in later ledgers are deleted too.
    /// - installment: every later installment of the group is deleted; this
    ///   one and the earlier ones stay.
    ///
    /// Income and one-off variable expenses cannot be terminated.
    pub async fn terminate_entry(
        &self,
        actor: &Actor,
        entry_id: Uuid,
        termination: Termination,
    ) -> ResultEngine<TerminationOutcome> {
        actor.require_write()?;
        let outcome = with_tx!(self, |db_tx| {
            let mut entry = store::require_entry(&db_tx, entry_id).await?;
            let ledger = store::require_ledger(&db_tx, entry.ledger_id).await?;
            let removed = self
                .terminate_in_tx(&db_tx, &mut entry, &ledger, termination)
                .await?;
            Ok::<_, EngineError>(TerminationOutcome { entry, removed })
        })?;

        tracing::info!(
            entry = %outcome.entry.id,
            removed = outcome.removed,
            ?termination,
            user = %actor.user_id,
            "entry terminated"
        );
        Ok(outcome)
    }

    async fn terminate_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        entry: &mut Entry,
        ledger: &Ledger,
        termination: Termination,
    ) -> ResultEngine<u64> {
        if let Some(installment) = entry.installment {
            return store::delete_later_installments(db_tx, installment.group_id, installment.index)
                .await;
        }
        if entry.kind != EntryKind::FixedExpense || !entry.is_recurring {
            return Err(EngineError::InvalidEntry(format!(
                "{} entries cannot be terminated",
                entry.kind
            )));
        }

        if entry.is_active {
            entry.is_active = false;
            store::update_entry(db_tx, entry).await?;
        }
        match (termination, entry.series_id) {
            (Termination::StopAndRetract, Some(series_id)) => {
                store::delete_series_after(db_tx, series_id, ledger.period).await
            }
            _ => Ok(0),
        }
    }

    /// Delete a single entry.
    pub async fn delete_entry(&self, actor: &Actor, entry_id: Uuid) -> ResultEngine<()> {
        actor.require_write()?;
        if !store::delete_entry(&self.database, entry_id).await? {
            return Err(EngineError::KeyNotFound(format!("entry {entry_id}")));
        }
        tracing::info!(entry = %entry_id, user = %actor.user_id, "entry deleted");
        Ok(())
    }

    /// Replace the whole installment group of `entry_id` with `count` new
    /// installments.
    ///
    /// The group is rebuilt from its earliest remaining installment (amount,
    /// account and base description), starts on the date installment 1 had
    /// and keeps its group id. The delete and the re-creation share one
    /// transaction.
    pub async fn reschedule_installments(
        &self,
        actor: &Actor,
        entry_id: Uuid,
        count: u32,
    ) -> ResultEngine<Registration> {
        actor.require_write()?;
        ensure_installment_count(count)?;

        let registration = with_tx!(self, |db_tx| {
            let entry = store::require_entry(&db_tx, entry_id).await?;
            let Some(installment) = entry.installment else {
                return Err(EngineError::InvalidEntry(format!(
                    "entry {entry_id} is not an installment"
                )));
            };

            let group = store::entries_in_group(&db_tx, installment.group_id).await?;
            // Sorted by index, and `entry` itself is in the group.
            let first = group.first().unwrap_or(&entry);
            let date = group_start(&group).unwrap_or(entry.date);

            let plan = InstallmentPlan {
                group_id: installment.group_id,
                description: base_description(&first.description).to_string(),
                amount: first.amount,
                date,
                is_digital: first.is_digital,
                count,
            };

            store::delete_group(&db_tx, installment.group_id).await?;
            let (origin, created) =
                propagation::find_or_open_ledger(&db_tx, Period::from_date(date)?).await?;
            let mut registration = self.split_installments(&db_tx, &origin, &plan).await?;
            if created {
                registration.created_ledgers.insert(0, origin);
            }
            Ok::<_, EngineError>(registration)
        })?;

        tracing::info!(
            entry = %entry_id,
            installments = count,
            created_ledgers = registration.created_ledgers.len(),
            user = %actor.user_id,
            "installments rescheduled"
        );
        Ok(registration)
    }
}
