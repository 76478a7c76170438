//! The module contains the `Entry` type: one income or expense movement in a
//! ledger.
//!
//! Entries are split in two independent sub-ledgers by `is_digital`
//! (physical cash vs. digital account). Fixed expenses may be recurring and
//! belong to a series; variable expenses may be one installment of a group.
use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, month::midday, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    FixedExpense,
    VariableExpense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::FixedExpense => "fixed_expense",
            Self::VariableExpense => "variable_expense",
        }
    }

    #[must_use]
    pub fn is_expense(self) -> bool {
        !matches!(self, Self::Income)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "fixed_expense" => Ok(Self::FixedExpense),
            "variable_expense" => Ok(Self::VariableExpense),
            other => Err(EngineError::InvalidEntry(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// Position of an entry inside an installment group.
///
/// `1 <= index <= count` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub group_id: Uuid,
    pub index: u32,
    pub count: u32,
}

impl Installment {
    pub fn new(group_id: Uuid, index: u32, count: u32) -> ResultEngine<Self> {
        if index == 0 || index > count {
            return Err(EngineError::InvalidEntry(format!(
                "installment {index}/{count} out of range"
            )));
        }
        Ok(Self {
            group_id,
            index,
            count,
        })
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index == self.count
    }

    /// Description suffix, e.g. `(2/3)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("({}/{})", self.index, self.count)
    }
}

/// Strip a trailing installment label (`"Notebook (2/3)"` -> `"Notebook"`).
pub(crate) fn base_description(description: &str) -> &str {
    let trimmed = description.trim_end();
    let Some(open) = trimmed.rfind(" (") else {
        return trimmed;
    };
    let label = &trimmed[open + 2..];
    let is_label = label
        .strip_suffix(')')
        .and_then(|inner| inner.split_once('/'))
        .is_some_and(|(i, n)| {
            !i.is_empty()
                && !n.is_empty()
                && i.chars().all(|c| c.is_ascii_digit())
                && n.chars().all(|c| c.is_ascii_digit())
        });
    if is_label { &trimmed[..open] } else { trimmed }
}

/// Represent a movement inside a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub ledger_id: Uuid,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub is_digital: bool,
    pub is_recurring: bool,
    pub is_active: bool,
    /// Shared by every copy of one recurring fixed expense.
    pub series_id: Option<Uuid>,
    pub installment: Option<Installment>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// A plain entry: not recurring, not part of an installment group.
    pub(crate) fn new(
        ledger_id: Uuid,
        description: String,
        amount: Money,
        date: NaiveDate,
        kind: EntryKind,
        is_digital: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ledger_id,
            description,
            amount,
            date,
            kind,
            is_digital,
            is_recurring: false,
            is_active: true,
            series_id: None,
            installment: None,
            created_at: Utc::now(),
        }
    }

    /// A copy of this recurring expense in another ledger, dated `date`.
    pub(crate) fn recurring_copy(&self, ledger_id: Uuid, date: NaiveDate) -> Self {
        let mut copy = Self::new(
            ledger_id,
            self.description.clone(),
            self.amount,
            date,
            EntryKind::FixedExpense,
            self.is_digital,
        );
        copy.is_recurring = true;
        copy.series_id = self.series_id;
        copy
    }

    /// `true` for entries the carry-forward copies into the next ledger.
    #[must_use]
    pub fn propagates(&self) -> bool {
        self.kind == EntryKind::FixedExpense && self.is_recurring && self.is_active
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date,
            self.amount,
            self.description,
            if self.is_digital { "digital" } else { "físico" }
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub ledger_id: String,
    pub description: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub kind: String,
    pub is_digital: bool,
    pub is_recurring: bool,
    pub is_active: bool,
    pub series_id: Option<String>,
    pub group_id: Option<String>,
    pub installment_index: Option<i32>,
    pub installment_count: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::ledgers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Ledgers,
}

impl Related<super::ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ledgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            ledger_id: ActiveValue::Set(entry.ledger_id.to_string()),
            description: ActiveValue::Set(entry.description.clone()),
            amount_minor: ActiveValue::Set(entry.amount.cents()),
            occurred_at: ActiveValue::Set(midday(entry.date)),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            is_digital: ActiveValue::Set(entry.is_digital),
            is_recurring: ActiveValue::Set(entry.is_recurring),
            is_active: ActiveValue::Set(entry.is_active),
            series_id: ActiveValue::Set(entry.series_id.map(|id| id.to_string())),
            group_id: ActiveValue::Set(entry.installment.map(|i| i.group_id.to_string())),
            installment_index: ActiveValue::Set(entry.installment.map(|i| i.index as i32)),
            installment_count: ActiveValue::Set(entry.installment.map(|i| i.count as i32)),
            created_at: ActiveValue::Set(entry.created_at),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = EntryKind::try_from(model.kind.as_str())?;
        if model.is_recurring && kind != EntryKind::FixedExpense {
            return Err(EngineError::InvalidEntry(format!(
                "entry {} is recurring but not a fixed expense",
                model.id
            )));
        }
        if model.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "entry {} has a negative amount",
                model.id
            )));
        }

        let installment = match (
            model.group_id.as_deref(),
            model.installment_index,
            model.installment_count,
        ) {
            (None, None, None) => None,
            (Some(group_id), Some(index), Some(count)) => {
                let index = u32::try_from(index).unwrap_or(0);
                let count = u32::try_from(count).unwrap_or(0);
                Some(Installment::new(
                    parse_uuid(group_id, "installment group")?,
                    index,
                    count,
                )?)
            }
            _ => {
                return Err(EngineError::InvalidEntry(format!(
                    "entry {} has a partial installment",
                    model.id
                )));
            }
        };

        Ok(Self {
            id: parse_uuid(&model.id, "entry")?,
            ledger_id: parse_uuid(&model.ledger_id, "ledger")?,
            description: model.description,
            amount: Money::new(model.amount_minor),
            date: model.occurred_at.date_naive(),
            kind,
            is_digital: model.is_digital,
            is_recurring: model.is_recurring,
            is_active: model.is_active,
            series_id: model
                .series_id
                .as_deref()
                .map(|id| parse_uuid(id, "series"))
                .transpose()?,
            installment,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_storage_names() {
        for kind in [
            EntryKind::Income,
            EntryKind::FixedExpense,
            EntryKind::VariableExpense,
        ] {
            assert_eq!(EntryKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(EntryKind::try_from("transfer").is_err());
    }

    #[test]
    fn installment_bounds() {
        let group = Uuid::new_v4();
        assert!(Installment::new(group, 0, 3).is_err());
        assert!(Installment::new(group, 4, 3).is_err());
        let last = Installment::new(group, 3, 3).unwrap();
        assert!(last.is_last());
        assert_eq!(last.label(), "(3/3)");
    }

    #[test]
    fn base_description_strips_only_installment_labels() {
        assert_eq!(base_description("Notebook (2/3)"), "Notebook");
        assert_eq!(base_description("Notebook"), "Notebook");
        assert_eq!(base_description("Som (novo)"), "Som (novo)");
        assert_eq!(base_description("Cadeiras (10/12) "), "Cadeiras");
    }

    #[test]
    fn partial_installment_is_rejected() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            ledger_id: Uuid::new_v4().to_string(),
            description: "Notebook (1/3)".to_string(),
            amount_minor: 30000,
            occurred_at: Utc::now(),
            kind: "variable_expense".to_string(),
            is_digital: false,
            is_recurring: false,
            is_active: true,
            series_id: None,
            group_id: Some(Uuid::new_v4().to_string()),
            installment_index: Some(1),
            installment_count: None,
            created_at: Utc::now(),
        };
        assert!(matches!(
            Entry::try_from(model),
            Err(EngineError::InvalidEntry(_))
        ));
    }
}
