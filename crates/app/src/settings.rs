//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `TESOURARIA__*` environment variables
//! (e.g. `TESOURARIA__APP__LEVEL=debug`).
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "tesouraria.db"
//!
//! [operator]
//! user = "maria"
//! role = "treasurer"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("tesouraria.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

/// Default identity used for engine calls when no CLI flag overrides it.
#[derive(Debug, Deserialize)]
pub struct Operator {
    pub user: String,
    pub role: String,
}

impl Default for Operator {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            role: "admin".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub operator: Operator,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TESOURARIA").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.database.url(), "sqlite:tesouraria.db?mode=rwc");
        assert_eq!(settings.operator.role, "admin");
    }

    #[test]
    fn reads_memory_database_and_operator() {
        let settings = parse(
            r#"
            database = "memory"

            [app]
            level = "debug"

            [operator]
            user = "maria"
            role = "treasurer"
            "#,
        );
        assert_eq!(settings.database.url(), "sqlite::memory:");
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.operator.user, "maria");
    }
}
