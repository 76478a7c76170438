mod common;

use common::{date, engine_with_db, ledger, period, reais, treasurer};
use engine::{EngineError, Money, NewEntryCmd};

#[tokio::test]
async fn opening_balance_follows_the_previous_months() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;
    engine
        .register_entry(
            &actor,
            NewEntryCmd::fixed_expense(january.id, "Aluguel", reais(500), date(2025, 1, 10)),
        )
        .await
        .unwrap();
    let february = ledger(&engine, "Fevereiro", 2025).await;

    assert_eq!(engine.opening_balance(period("Janeiro", 2025)).await.unwrap(), None);
    assert_eq!(
        engine.opening_balance(period("Fevereiro", 2025)).await.unwrap(),
        Some(reais(-500))
    );
    assert_eq!(engine.closing_balance(february.id).await.unwrap(), reais(-1000));
}

#[tokio::test]
async fn opening_balance_is_none_only_without_earlier_ledgers() {
    let (engine, _db) = engine_with_db().await;
    assert_eq!(engine.opening_balance(period("Maio", 2025)).await.unwrap(), None);

    // An empty earlier ledger is history that nets to zero.
    ledger(&engine, "Dezembro", 2024).await;
    assert_eq!(
        engine.opening_balance(period("Maio", 2025)).await.unwrap(),
        Some(Money::ZERO)
    );
    assert_eq!(engine.opening_balance(period("Dezembro", 2024)).await.unwrap(), None);

    // A period with no ledger of its own still has an opening balance.
    assert_eq!(
        engine.opening_balance(period("Janeiro", 2030)).await.unwrap(),
        Some(Money::ZERO)
    );
}

#[tokio::test]
async fn opening_balance_sums_every_earlier_ledger() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let march = ledger(&engine, "Março", 2024).await;
    let october = ledger(&engine, "Outubro", 2024).await;
    let january = ledger(&engine, "Janeiro", 2025).await;

    for (ledger_id, day) in [
        (march.id, date(2024, 3, 3)),
        (october.id, date(2024, 10, 3)),
        (january.id, date(2025, 1, 3)),
    ] {
        engine
            .register_entry(
                &actor,
                NewEntryCmd::income(ledger_id, "Dízimos", reais(1000), day),
            )
            .await
            .unwrap();
        engine
            .register_entry(
                &actor,
                NewEntryCmd::variable_expense(ledger_id, "Material", Money::new(25_050), day)
                    .digital(true),
            )
            .await
            .unwrap();
    }

    // Two earlier ledgers at R$ 749,50 each.
    assert_eq!(
        engine.opening_balance(period("Janeiro", 2025)).await.unwrap(),
        Some(Money::new(149_900))
    );
    assert_eq!(
        engine.opening_balance(period("Outubro", 2024)).await.unwrap(),
        Some(Money::new(74_950))
    );
    assert_eq!(
        engine.closing_balance(january.id).await.unwrap(),
        Money::new(224_850)
    );
}

#[tokio::test]
async fn reads_are_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;
    engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", reais(70), date(2025, 1, 8)),
        )
        .await
        .unwrap();
    let february = ledger(&engine, "Fevereiro", 2025).await;

    let totals = engine.totals(january.id).await.unwrap();
    assert_eq!(totals, engine.totals(january.id).await.unwrap());
    assert_eq!(totals.income, reais(70));
    assert_eq!(totals.expense, Money::ZERO);

    let opening = engine.opening_balance(february.period).await.unwrap();
    assert_eq!(opening, engine.opening_balance(february.period).await.unwrap());
    assert_eq!(opening, Some(reais(70)));
}

#[tokio::test]
async fn summary_splits_physical_and_digital_accounts() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;
    engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Oferta", reais(100), date(2025, 1, 2)),
        )
        .await
        .unwrap();
    let february = ledger(&engine, "Fevereiro", 2025).await;
    for cmd in [
        NewEntryCmd::income(february.id, "Dízimos", reais(800), date(2025, 2, 2)),
        NewEntryCmd::income(february.id, "Pix", reais(300), date(2025, 2, 3)).digital(true),
        NewEntryCmd::fixed_expense(february.id, "Água", reais(90), date(2025, 2, 10)),
        NewEntryCmd::variable_expense(february.id, "Gráfica", reais(60), date(2025, 2, 12))
            .digital(true),
    ] {
        engine.register_entry(&actor, cmd).await.unwrap();
    }

    let summary = engine.ledger_summary(february.id).await.unwrap();
    assert_eq!(summary.ledger.id, february.id);
    assert_eq!(summary.entries.len(), 4);
    assert_eq!(summary.physical.income, reais(800));
    assert_eq!(summary.physical.expense, reais(90));
    assert_eq!(summary.digital.income, reais(300));
    assert_eq!(summary.digital.expense, reais(60));
    assert_eq!(summary.totals.net().unwrap(), reais(950));
    assert_eq!(summary.opening_balance, Some(reais(100)));
    assert_eq!(summary.closing_balance, reais(1050));
    assert_eq!(
        summary.closing_balance,
        engine.closing_balance(february.id).await.unwrap()
    );
}

#[tokio::test]
async fn totals_near_the_amount_limit_do_not_overflow() {
    let (engine, _db) = engine_with_db().await;
    let actor = treasurer();
    let january = ledger(&engine, "Janeiro", 2025).await;

    let huge = engine
        .register_entry(
            &actor,
            NewEntryCmd::income(january.id, "Doação", Money::new(i64::MAX / 2 + 1), date(2025, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(huge, EngineError::InvalidAmount(_)));

    let limit = Money::new(10_000_000_000_000);
    for day in [2, 3] {
        engine
            .register_entry(
                &actor,
                NewEntryCmd::income(january.id, "Doação", limit, date(2025, 1, day)),
            )
            .await
            .unwrap();
    }
    let totals = engine.totals(january.id).await.unwrap();
    assert_eq!(totals.income, Money::new(20_000_000_000_000));
    let february = ledger(&engine, "Fevereiro", 2025).await;
    assert_eq!(
        engine.closing_balance(february.id).await.unwrap(),
        Money::new(20_000_000_000_000)
    );
}
