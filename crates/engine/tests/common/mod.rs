#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Actor, Engine, Ledger, Money, Period, Role};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn treasurer() -> Actor {
    Actor::new("maria", Role::Treasurer)
}

pub fn member() -> Actor {
    Actor::new("joao", Role::Member)
}

pub fn period(month: &str, year: i32) -> Period {
    Period::parse(month, year).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn reais(value: i64) -> Money {
    Money::reais(value)
}

pub async fn ledger(engine: &Engine, month: &str, year: i32) -> Ledger {
    engine
        .create_ledger(&treasurer(), period(month, year))
        .await
        .unwrap()
}
