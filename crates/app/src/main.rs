use std::process::ExitCode;

use clap::Parser;
use engine::{
    Actor, Engine, EngineError, EntryPatch, LedgerRange, NewEntryCmd, Period, Role, Termination,
};
use migration::{Migrator, MigratorTrait};
use thiserror::Error;

use cli::{Cli, Command, EntryCommand, LedgerCommand, PeriodArgs};
use settings::Settings;

mod cli;
mod render;
mod settings;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    fn is_user_error(&self) -> bool {
        match self {
            AppError::Engine(err) => err.is_user_error(),
            AppError::Usage(_) => true,
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::new(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: failed to load settings: {err}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tesouraria={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_user_error() => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
        Err(err) => {
            tracing::error!("{err:?}");
            eprintln!("error: internal error, see logs");
            ExitCode::from(2)
        }
    }
}

fn actor(cli: &Cli, settings: &Settings) -> Result<Actor, AppError> {
    let user = cli
        .user
        .clone()
        .unwrap_or_else(|| settings.operator.user.clone());
    let role = match cli.role {
        Some(role) => role,
        None => Role::try_from(settings.operator.role.as_str())?,
    };
    Ok(Actor::new(user, role))
}

async fn connect(cli: &Cli, settings: &Settings) -> Result<Engine, AppError> {
    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Engine::builder().database(database).build().await?)
}

fn period(args: PeriodArgs) -> Result<Period, AppError> {
    Ok(Period::new(args.month, args.year)?)
}

async fn require_ledger(engine: &Engine, args: PeriodArgs) -> Result<engine::Ledger, AppError> {
    let period = period(args)?;
    engine
        .ledger_for(period)
        .await?
        .ok_or_else(|| AppError::Usage(format!("no ledger for {period}")))
}

async fn run(cli: Cli, settings: Settings) -> Result<(), AppError> {
    let actor = actor(&cli, &settings)?;
    let engine = connect(&cli, &settings).await?;

    match cli.command {
        Command::Ledger(ledger) => match ledger.command {
            LedgerCommand::Create(args) => {
                let ledger = engine.create_ledger(&actor, period(args)?).await?;
                let entries = engine.list_entries(ledger.id).await?;
                println!("{}", render::ledger_line(&ledger));
                println!("{} recurring expenses carried forward", entries.len());
            }
            LedgerCommand::List => {
                for ledger in engine.list_ledgers(LedgerRange::All).await? {
                    println!("{}", render::ledger_line(&ledger));
                }
            }
            LedgerCommand::Show { period, json } => {
                let ledger = require_ledger(&engine, period).await?;
                let summary = engine.ledger_summary(ledger.id).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    println!("{}", render::summary(&summary));
                }
            }
            LedgerCommand::Delete(args) => {
                let ledger = require_ledger(&engine, args).await?;
                let removed = engine.delete_ledger(&actor, ledger.id).await?;
                println!("deleted {} and {removed} entries", ledger.period);
            }
        },
        Command::Entry(entry) => match entry.command {
            EntryCommand::Add(args) => {
                let ledger = require_ledger(&engine, args.period).await?;
                let date = args.date.unwrap_or_else(|| ledger.period.first_day());
                let mut cmd = NewEntryCmd::new(
                    ledger.id,
                    args.kind.into(),
                    args.description,
                    args.amount,
                    date,
                )
                .digital(args.digital);
                if let Some(count) = args.installments {
                    cmd = cmd.installments(count);
                }
                let registration = engine.register_entry(&actor, cmd).await?;
                for entry in &registration.entries {
                    println!("{}", render::entry_line(entry));
                }
                if registration.propagated > 0 {
                    println!("copied to {} later ledgers", registration.propagated);
                }
                for ledger in &registration.created_ledgers {
                    println!("created ledger {}", ledger.period);
                }
            }
            EntryCommand::List(args) => {
                let ledger = require_ledger(&engine, args).await?;
                for entry in engine.list_entries(ledger.id).await? {
                    println!("{}", render::entry_line(&entry));
                }
            }
            EntryCommand::Edit(args) => {
                let mut patch = EntryPatch::new();
                if let Some(description) = args.description {
                    patch = patch.description(description);
                }
                if let Some(amount) = args.amount {
                    patch = patch.amount(amount);
                }
                if let Some(date) = args.date {
                    patch = patch.date(date);
                }
                if let Some(digital) = args.digital {
                    patch = patch.digital(digital);
                }
                if args.terminate {
                    patch = patch.terminate(termination(args.retract));
                }
                if patch.is_empty() {
                    return Err(AppError::Usage("nothing to change".to_string()));
                }
                let entry = engine.update_entry(&actor, args.id, patch).await?;
                println!("{}", render::entry_line(&entry));
            }
            EntryCommand::Terminate { id, retract } => {
                let outcome = engine
                    .terminate_entry(&actor, id, termination(retract))
                    .await?;
                println!("{}", render::entry_line(&outcome.entry));
                println!("{} later entries removed", outcome.removed);
            }
            EntryCommand::Delete { id } => {
                engine.delete_entry(&actor, id).await?;
                println!("deleted {id}");
            }
            EntryCommand::Reschedule { id, count } => {
                let registration = engine.reschedule_installments(&actor, id, count).await?;
                for entry in &registration.entries {
                    println!("{}", render::entry_line(entry));
                }
            }
        },
        Command::Balance(args) => {
            let period = period(args)?;
            println!("{}", render::opening_line(engine.opening_balance(period).await?));
            if let Some(ledger) = engine.ledger_for(period).await? {
                println!("Saldo final: {}", engine.closing_balance(ledger.id).await?);
            }
        }
    }

    Ok(())
}

fn termination(retract: bool) -> Termination {
    if retract {
        Termination::StopAndRetract
    } else {
        Termination::Stop
    }
}
