mod common;

use common::{date, engine_with_db, ledger, member, reais, treasurer};
use engine::{EngineError, EntryKind, LedgerRange, Money, NewEntryCmd};
use uuid::Uuid;

#[tokio::test]
async fn fixed_expense_is_copied_once_into_every_later_ledger() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;
    let march = ledger(&engine, "Março", 2025).await;
    let april = ledger(&engine, "Abril", 2025).await;
    let july = ledger(&engine, "Julho", 2025).await;

    let registration = engine
        .register_entry(
            &actor,
            NewEntryCmd::fixed_expense(march.id, "Energia", reais(250), date(2025, 3, 31)),
        )
        .await
        .unwrap();
    assert_eq!(registration.propagated, 2);
    assert!(registration.created_ledgers.is_empty());

    let original = registration.entry().unwrap();
    assert!(original.is_recurring && original.is_active);
    assert!(original.series_id.is_some());
    assert_eq!(original.installment, None);

    assert!(engine.list_entries(january.id).await.unwrap().is_empty());
    assert_eq!(engine.list_entries(march.id).await.unwrap().len(), 1);

    for (later, day) in [(april, date(2025, 4, 30)), (july, date(2025, 7, 31))] {
        let entries = engine.list_entries(later.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        let copy = &entries[0];
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.description, "Energia");
        assert_eq!(copy.amount, reais(250));
        assert_eq!(copy.date, day);
        assert_eq!(copy.series_id, original.series_id);
        assert!(copy.is_recurring && copy.is_active);
    }

    // Gaps are not filled by a fixed expense.
    assert_eq!(engine.list_ledgers(LedgerRange::All).await.unwrap().len(), 4);
}

#[tokio::test]
async fn income_and_one_off_expenses_stay_on_their_ledger() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let may = ledger(&engine, "Maio", 2025).await;
    let june = ledger(&engine, "Junho", 2025).await;

    let income = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(may.id, "  Oferta missionária  ", Money::new(12_345), date(2025, 5, 4))
                .digital(true),
        )
        .await
        .unwrap();
    assert_eq!(income.propagated, 0);
    let income = income.entry().unwrap();
    assert_eq!(income.description, "Oferta missionária");
    assert_eq!(income.kind, EntryKind::Income);
    assert!(income.is_digital && !income.is_recurring);

    engine
        .register_entry(
            &actor,
            NewEntryCmd::variable_expense(may.id, "Lanche", reais(45), date(2025, 5, 18)),
        )
        .await
        .unwrap();

    let entries = engine.list_entries(may.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].description, "Oferta missionária");
    assert!(engine.list_entries(june.id).await.unwrap().is_empty());
    assert_eq!(engine.entry(income.id).await.unwrap().amount, Money::new(12_345));
}

#[tokio::test]
async fn registration_validates_before_writing() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;

    let zero = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", Money::ZERO, date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(zero, EngineError::InvalidAmount(_)));

    let negative = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", reais(-3), date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(negative, EngineError::InvalidAmount(_)));

    let blank = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "   ", reais(3), date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(blank, EngineError::InvalidEntry(_)));

    let split_income = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", reais(3), date(2025, 1, 2)).installments(3),
        )
        .await
        .unwrap_err();
    assert!(matches!(split_income, EngineError::InvalidEntry(_)));

    let single_installment = engine
        .register_entry(
            &actor,
            NewEntryCmd::variable_expense(january.id, "Cadeiras", reais(3), date(2025, 1, 2))
                .installments(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(single_installment, EngineError::InvalidEntry(_)));

    let wrong_month = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", reais(3), date(2025, 2, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(wrong_month, EngineError::InvalidEntry(_)));

    assert!(engine.list_entries(january.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn registration_on_missing_ledger_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let id = Uuid::new_v4();

    let err = engine
        .register_entry(
            &treasurer(),
            NewEntryCmd::income(id, "Oferta", reais(10), date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(format!("ledger {id}")));
}

#[tokio::test]
async fn members_cannot_write() {
    let (engine, _db) = engine_with_db().await;
    let january = ledger(&engine, "Janeiro", 2025).await;
    let entry = engine
        .register_entry(
            &treasurer(),
            NewEntryCmd::fixed_expense(january.id, "Aluguel", reais(500), date(2025, 1, 10)),
        )
        .await
        .unwrap()
        .entries
        .remove(0);

    let reader = member();
    let err = engine
        .register_entry(
            &reader,
            NewEntryCmd::income(january.id, "Oferta", reais(10), date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(matches!(
        engine.delete_entry(&reader, entry.id).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.delete_ledger(&reader, january.id).await,
        Err(EngineError::Forbidden(_))
    ));

    // Reads need no privileges.
    let listed = engine.list_entries(january.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, entry.id);
}

#[tokio::test]
async fn delete_entry_removes_only_that_entry() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;
    let february = ledger(&engine, "Fevereiro", 2025).await;
    let rent = engine
        .register_entry(
            &actor,
            NewEntryCmd::fixed_expense(january.id, "Aluguel", reais(500), date(2025, 1, 10)),
        )
        .await
        .unwrap();
    let original = rent.entry().unwrap().id;

    engine.delete_entry(&actor, original).await.unwrap();

    assert!(engine.list_entries(january.id).await.unwrap().is_empty());
    assert_eq!(engine.list_entries(february.id).await.unwrap().len(), 1);
    assert_eq!(
        engine.delete_entry(&actor, original).await.unwrap_err(),
        EngineError::KeyNotFound(format!("entry {original}"))
    );
}
