//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

pub(crate) const MAX_DESCRIPTION_LEN: usize = 200;
pub(crate) const MAX_INSTALLMENTS: u32 = 120;
/// R$ 100 bilhões. Keeps sums over any realistic history inside `i64`.
pub(crate) const MAX_AMOUNT: Money = Money::new(10_000_000_000_000);

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a description and reject empty or oversized ones.
pub(crate) fn normalize_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidEntry(
            "description must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::InvalidEntry(format!(
            "description longer than {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_amount(amount: Money) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_installment_count(count: u32) -> ResultEngine<()> {
    if !(2..=MAX_INSTALLMENTS).contains(&count) {
        return Err(EngineError::InvalidEntry(format!(
            "installment count must be between 2 and {MAX_INSTALLMENTS}, got {count}"
        )));
    }
    Ok(())
}
