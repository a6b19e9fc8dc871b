//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.
//! Every option has a default, so the service starts with no environment at all.

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DBHOST`, `DBPORT`, `DBNAME`, `DBUSER`, `DBPASS`: PostgreSQL connection
/// - `HOST`, `PORT`: address the HTTP server binds to
/// - `CALLBACK_URL`: saga orchestrator endpoint receiving withdrawal outcomes
/// - `CALLBACK_TIMEOUT_SECS`: timeout for a single callback request
/// - `DB_MAX_CONNECTIONS`: size of the connection pool
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "dbhost", default = "default_db_host")]
    pub db_host: String,

    #[serde(rename = "dbport", default = "default_db_port")]
    pub db_port: u16,

    #[serde(rename = "dbname", default = "default_db_name")]
    pub db_name: String,

    #[serde(rename = "dbuser", default = "default_db_user")]
    pub db_user: String,

    #[serde(rename = "dbpass", default = "default_db_pass")]
    pub db_pass: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_callback_url")]
    pub callback_url: String,

    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
}

fn default_db_host() -> String {
    "account-postgresql".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "accountdb".to_string()
}

fn default_db_user() -> String {
    "accountuser".to_string()
}

fn default_db_pass() -> String {
    "accountpasswd".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

/// Order service endpoint that collects account outcomes for the booking saga.
fn default_callback_url() -> String {
    "http://book.saga.svc.cluster.local:9000/book/callback/account".to_string()
}

fn default_callback_timeout_secs() -> u64 {
    5
}

fn default_db_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed into
    /// the expected type (e.g., a non-numeric `PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build an explicit config from `(name, value)` pairs, as if they were
    /// the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// PostgreSQL connection options. SSL is disabled, the database is
    /// expected on a private cluster network.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .database(&self.db_name)
            .username(&self.db_user)
            .password(&self.db_pass)
            .ssl_mode(PgSslMode::Disable)
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }
}
