//! Initial schema migration.
//!
//! - `ledgers`: one financial record per calendar month
//! - `entries`: income and expense movements of a ledger

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Ledgers {
    Table,
    Id,
    Month,
    MonthIndex,
    Year,
    CreatedAt,
}

#[derive(Iden)]
enum Entries {
    Table,
    Id,
    LedgerId,
    Description,
    AmountMinor,
    OccurredAt,
    Kind,
    IsDigital,
    IsRecurring,
    IsActive,
    SeriesId,
    GroupId,
    InstallmentIndex,
    InstallmentCount,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Ledgers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Ledgers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ledgers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Ledgers::Month).string().not_null())
                    .col(ColumnDef::new(Ledgers::MonthIndex).integer().not_null())
                    .col(ColumnDef::new(Ledgers::Year).integer().not_null())
                    .col(ColumnDef::new(Ledgers::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // At most one ledger per month.
        manager
            .create_index(
                Index::create()
                    .name("idx-ledgers-year-month_index-unique")
                    .table(Ledgers::Table)
                    .col(Ledgers::Year)
                    .col(Ledgers::MonthIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Entries::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Entries::LedgerId).string().not_null())
                    .col(ColumnDef::new(Entries::Description).string().not_null())
                    .col(ColumnDef::new(Entries::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Entries::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Entries::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Entries::IsDigital)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Entries::IsRecurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Entries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Entries::SeriesId).string())
                    .col(ColumnDef::new(Entries::GroupId).string())
                    .col(ColumnDef::new(Entries::InstallmentIndex).integer())
                    .col(ColumnDef::new(Entries::InstallmentCount).integer())
                    .col(ColumnDef::new(Entries::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-entries-ledger_id")
                            .from(Entries::Table, Entries::LedgerId)
                            .to(Ledgers::Table, Ledgers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-ledger_id-occurred_at")
                    .table(Entries::Table)
                    .col(Entries::LedgerId)
                    .col(Entries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-group_id-installment_index")
                    .table(Entries::Table)
                    .col(Entries::GroupId)
                    .col(Entries::InstallmentIndex)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-entries-series_id")
                    .table(Entries::Table)
                    .col(Entries::SeriesId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ledgers::Table).to_owned())
            .await
    }
}
