use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, anyhow};
use tracing::info;

pub struct Config {
    pub port: u16,
    pub db_url: String,
    pub db_name: String,
    /// Where this server is reachable from a browser; login redirects come back here.
    pub public_url: String,
    pub session_minutes: i64,
    pub identity: Option<IdentityConfig>,
}

pub struct IdentityConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub auth_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            db_url: "mongodb://localhost:27017".to_owned(),
            db_name: "volunteers".to_owned(),
            public_url: "http://localhost:5000".to_owned(),
            session_minutes: 60,
            identity: None,
        }
    }
}

impl Config {
    /// Reads the environment, after pulling in `.env` if there is one.
    pub fn load() -> anyhow::Result<Self> {
        if dotenv::dotenv().is_ok() {
            info!("loaded .env");
        }

        let defaults = Config::default();
        let identity = match var("CIVIC_CLIENT_ID") {
            Some(client_id) => Some(IdentityConfig {
                client_id,
                client_secret: var("CIVIC_CLIENT_SECRET"),
                auth_url: try_load("CIVIC_AUTH_URL", "https://auth.civic.com/oauth".to_owned())?,
            }),
            None => {
                info!("CIVIC_CLIENT_ID not set, login is disabled");
                None
            }
        };

        Ok(Self {
            port: try_load("PORT", defaults.port)?,
            db_url: try_load("DB_URL", defaults.db_url)?,
            db_name: try_load("DB_NAME", defaults.db_name)?,
            public_url: try_load::<String>("PUBLIC_URL", defaults.public_url)?
                .trim_end_matches('/')
                .to_owned(),
            session_minutes: try_load("SESSION_MINUTES", defaults.session_minutes)?,
            identity,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(value) => value
            .parse()
            .map_err(|e| anyhow!("invalid {key} value {value:?}: {e}"))
            .with_context(|| format!("environment misconfigured at {key}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
