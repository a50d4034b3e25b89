//! Settings for the application.
//!
//! Built-in defaults, then an optional `settings.toml` in the working
//! directory, then `EXPENSES__*` environment variables
//! (e.g. `EXPENSES__SERVER__PORT=8080`).
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_SQLITE_PATH: &str = "./expenses.db";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    database: Option<Database>,
}

impl Server {
    pub fn database(&self) -> Database {
        self.database
            .clone()
            .unwrap_or_else(|| Database::Sqlite(DEFAULT_SQLITE_PATH.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub secret: String,
    pub token_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("EXPENSES")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("auth.token_ttl_secs", 360_000)?
            .build()?
            .try_deserialize()?;

        if settings.auth.secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.secret must not be empty".to_string()));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let settings = from_toml("[auth]\nsecret = \"s3cret\"").unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(
            settings.server.database(),
            Database::Sqlite(DEFAULT_SQLITE_PATH.to_string())
        );
        assert_eq!(settings.auth.token_ttl_secs, 360_000);
    }

    #[test]
    fn memory_database_can_be_selected() {
        let settings = from_toml(
            "[server]\nport = 8080\ndatabase = \"memory\"\n\n[auth]\nsecret = \"s3cret\"",
        )
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database(), Database::Memory);
    }

    #[test]
    fn sqlite_path_can_be_set() {
        let settings = from_toml(
            "[server]\ndatabase = { sqlite = \"/tmp/x.db\" }\n\n[auth]\nsecret = \"s3cret\"",
        )
        .unwrap();

        assert_eq!(
            settings.server.database(),
            Database::Sqlite("/tmp/x.db".to_string())
        );
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(from_toml("").is_err());
        assert!(from_toml("[auth]\nsecret = \"  \"").is_err());
    }
}
