//! Plain-text rendering of ledgers and entries for the terminal.
use std::fmt::Write;

use engine::{Entry, EntryKind, Ledger, LedgerSummary, Money, Totals};

fn kind_label(entry: &Entry) -> &'static str {
    match entry.kind {
        EntryKind::Income => "entrada",
        EntryKind::FixedExpense if entry.is_recurring && entry.is_active => "fixa",
        EntryKind::FixedExpense => "fixa (encerrada)",
        EntryKind::VariableExpense => "variável",
    }
}

pub fn entry_line(entry: &Entry) -> String {
    format!(
        "{}  {}  {:>14}  {:<18} {:<8} {}",
        entry.id,
        entry.date.format("%d/%m/%Y"),
        entry.amount.to_string(),
        kind_label(entry),
        if entry.is_digital { "digital" } else { "físico" },
        entry.description,
    )
}

pub fn ledger_line(ledger: &Ledger) -> String {
    format!("{}  {}", ledger.id, ledger.period)
}

fn totals_line(label: &str, totals: &Totals) -> String {
    format!(
        "{label:<10} entradas {:>14}   saídas {:>14}   saldo {:>14}",
        totals.income.to_string(),
        totals.expense.to_string(),
        totals
            .net()
            .map_or_else(|_| "-".to_string(), |net| net.to_string())
    )
}

pub fn opening_line(opening: Option<Money>) -> String {
    match opening {
        Some(balance) => format!("Saldo anterior: {balance}"),
        None => "Saldo anterior: sem histórico".to_string(),
    }
}

pub fn summary(summary: &LedgerSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Planilha {}", summary.ledger.period);
    let _ = writeln!(out);
    if summary.entries.is_empty() {
        let _ = writeln!(out, "(sem lançamentos)");
    }
    for entry in &summary.entries {
        let _ = writeln!(out, "{}", entry_line(entry));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", totals_line("Físico", &summary.physical));
    let _ = writeln!(out, "{}", totals_line("Digital", &summary.digital));
    let _ = writeln!(out, "{}", totals_line("Total", &summary.totals));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", opening_line(summary.opening_balance));
    let _ = write!(out, "Saldo final: {}", summary.closing_balance);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_history_is_not_zero() {
        assert_eq!(opening_line(None), "Saldo anterior: sem histórico");
        assert_eq!(opening_line(Some(Money::ZERO)), "Saldo anterior: R$ 0,00");
    }
}
