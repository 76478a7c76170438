//! The module contains the error the engine can throw.
//!
//! The errors fall in four families:
//!
//! - validation: [`InvalidMonth`], [`InvalidPeriod`], [`InvalidEntry`],
//!   [`InvalidAmount`], [`InvalidId`], [`InvalidRole`]. Raised before any
//!   write.
//! - lookup: [`KeyNotFound`] and [`ExistingKey`].
//! - authorization: [`Forbidden`].
//! - storage: [`Database`]. Multi-step operations are rolled back.
//!
//!  [`InvalidMonth`]: EngineError::InvalidMonth
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`InvalidEntry`]: EngineError::InvalidEntry
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`InvalidRole`]: EngineError::InvalidRole
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Database`]: EngineError::Database
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors the caller caused (bad input, missing key,
    /// missing permission). Storage errors are the only ones that are not.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }

    /// Map a unique constraint violation to [`EngineError::ExistingKey`],
    /// leaving every other database error untouched.
    pub(crate) fn from_insert(err: DbErr, key: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(key.into()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::InvalidEntry(a), Self::InvalidEntry(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
