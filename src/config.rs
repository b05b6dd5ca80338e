use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Process configuration sourced from the environment.
///
/// - `DATABASE_URL`: sqlx SQLite URL, e.g. `sqlite:accounts.db`. Unset or empty
///   leaves the account store disabled.
/// - `LOGLEVEL`: fallback tracing filter when `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database_url: Option<String>,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(&["database_url", "loglevel"]))
    }

    pub fn from_env() -> Result<Self, figment::Error> {
        let mut cfg: Config = Self::figment().extract()?;
        cfg.database_url = cfg
            .database_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Ok(cfg)
    }
}
