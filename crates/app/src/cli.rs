use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{EntryKind, Money, Month, Role};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "tesouraria")]
#[command(about = "Monthly ledgers for the church treasury")]
pub struct Cli {
    /// Settings file, without extension.
    #[arg(long, default_value = "settings")]
    pub config: String,

    /// Database connection string, overrides the settings file.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Acting user, overrides `operator.user`.
    #[arg(long)]
    pub user: Option<String>,

    /// Acting role (admin, treasurer, member), overrides `operator.role`.
    #[arg(long)]
    pub role: Option<Role>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, inspect and delete monthly ledgers.
    Ledger(Ledger),
    /// Register and edit entries.
    Entry(Entry),
    /// Print opening and closing balance of a month.
    Balance(PeriodArgs),
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PeriodArgs {
    /// Month name, e.g. `Janeiro` or `marco`.
    pub month: Month,
    pub year: i32,
}

#[derive(Args, Debug)]
pub struct Ledger {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    Create(PeriodArgs),
    List,
    Show {
        #[command(flatten)]
        period: PeriodArgs,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    Delete(PeriodArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Income,
    Fixed,
    Variable,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => EntryKind::Income,
            KindArg::Fixed => EntryKind::FixedExpense,
            KindArg::Variable => EntryKind::VariableExpense,
        }
    }
}

#[derive(Args, Debug)]
pub struct Entry {
    #[command(subcommand)]
    pub command: EntryCommand,
}

#[derive(Args, Debug)]
pub struct EntryAddArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
    #[arg(long, value_enum)]
    pub kind: KindArg,
    #[arg(long)]
    pub description: String,
    /// Amount in reais, `.` or `,` as decimal separator.
    #[arg(long)]
    pub amount: Money,
    /// Entry date (YYYY-MM-DD), defaults to the first day of the month.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Book on the digital account instead of physical cash.
    #[arg(long)]
    pub digital: bool,
    /// Split a variable expense in this many monthly installments.
    #[arg(long)]
    pub installments: Option<u32>,
}

#[derive(Args, Debug)]
pub struct EntryEditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<Money>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub digital: Option<bool>,
    /// Terminate the recurring expense or installment series at this entry.
    #[arg(long)]
    pub terminate: bool,
    /// With `--terminate`, also delete later copies of a recurring expense.
    #[arg(long, requires = "terminate")]
    pub retract: bool,
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    Add(EntryAddArgs),
    List(PeriodArgs),
    Edit(EntryEditArgs),
    Terminate {
        id: Uuid,
        /// Also delete later copies of a recurring expense.
        #[arg(long)]
        retract: bool,
    },
    Delete {
        id: Uuid,
    },
    /// Rebuild an installment series with a new number of installments.
    Reschedule {
        id: Uuid,
        count: u32,
    },
}
