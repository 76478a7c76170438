//! Monthly ledger engine.
//!
//! One [`Ledger`] per calendar month holds the [`Entry`]s of that month.
//! Recurring fixed expenses follow the ledgers forward in time, variable
//! expenses can be split in monthly installments, and balances are computed
//! by walking the earlier ledgers.
//!
//! The engine is built around an injected sea-orm connection:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use engine::{Actor, Engine, Period, Role};
//!
//! let db = sea_orm::Database::connect("sqlite::memory:").await?;
//! let engine = Engine::builder().database(db).build().await?;
//! let treasurer = Actor::new("maria", Role::Treasurer);
//! let january = engine
//!     .create_ledger(&treasurer, Period::parse("Janeiro", 2025)?)
//!     .await?;
//! # let _ = january;
//! # Ok(())
//! # }
//! ```

pub use commands::{EntryPatch, LedgerRange, NewEntryCmd, Termination};
pub use entries::{Entry, EntryKind, Installment};
pub use error::EngineError;
pub use ledgers::Ledger;
pub use money::Money;
pub use month::{Month, Period};
pub use ops::{Actor, Engine, EngineBuilder, Registration, Role, TerminationOutcome};
pub use summary::{LedgerSummary, Totals};

mod commands;
mod entries;
mod error;
mod ledgers;
mod money;
mod month;
mod ops;
mod store;
mod summary;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
