//! The module contains the `Ledger` type: the financial record of one
//! calendar month.
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Month, Period, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub period: Period,
    pub created_at: DateTime<Utc>,
}

impl Ledger {
    pub fn new(period: Period) -> Self {
        Self {
            id: Uuid::new_v4(),
            period,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn month(&self) -> Month {
        self.period.month()
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.period.year()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledgers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub month: String,
    pub month_index: i32,
    pub year: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ledger> for ActiveModel {
    fn from(ledger: &Ledger) -> Self {
        Self {
            id: ActiveValue::Set(ledger.id.to_string()),
            month: ActiveValue::Set(ledger.period.month().name().to_string()),
            month_index: ActiveValue::Set(ledger.period.month().index() as i32),
            year: ActiveValue::Set(ledger.period.year()),
            created_at: ActiveValue::Set(ledger.created_at),
        }
    }
}

impl TryFrom<Model> for Ledger {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month_index = u32::try_from(model.month_index)
            .map_err(|_| EngineError::InvalidMonth(format!("bad month index {}", model.month_index)))?;
        let month = Month::from_index(month_index)?;
        if model.month.parse::<Month>()? != month {
            return Err(EngineError::InvalidMonth(format!(
                "ledger {} stores {} with index {}",
                model.id, model.month, model.month_index
            )));
        }
        Ok(Self {
            id: parse_uuid(&model.id, "ledger")?,
            period: Period::new(month, model.year)?,
            created_at: model.created_at,
        })
    }
}
