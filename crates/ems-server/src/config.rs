//! Server configuration from environment variables.

use std::env;
use std::time::Duration;

use ems_auth::config::AuthConfig;
use ems_db::DbConfig;
use thiserror::Error;

use crate::reaper;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Full server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub reaper_interval: Duration,
}

impl ServerConfig {
    /// Read configuration from the environment. `EMS_JWT_SECRET` is
    /// the only required variable; everything else has a development
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("EMS_JWT_SECRET").map_err(|_| ConfigError::MissingVar("EMS_JWT_SECRET"))?;

        let mut auth = AuthConfig::new(jwt_secret);
        auth.pepper = env::var("EMS_PASSWORD_PEPPER").ok();
        if let Some(secs) = parse_var("EMS_SESSION_LIFETIME_SECS")? {
            auth.session_lifetime_secs = secs;
        }

        let mut db = DbConfig::default();
        if let Ok(url) = env::var("EMS_DB_URL") {
            db.url = url;
        }
        if let Ok(ns) = env::var("EMS_DB_NAMESPACE") {
            db.namespace = ns;
        }
        if let Ok(name) = env::var("EMS_DB_DATABASE") {
            db.database = name;
        }
        if let Ok(user) = env::var("EMS_DB_USERNAME") {
            db.username = user;
        }
        if let Ok(pass) = env::var("EMS_DB_PASSWORD") {
            db.password = pass;
        }

        let reaper_interval = match parse_var("EMS_REAPER_INTERVAL_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => reaper::DEFAULT_INTERVAL,
        };

        Ok(Self {
            bind_addr: env::var("EMS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into()),
            db,
            auth,
            reaper_interval,
        })
    }
}

fn parse_var(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(None),
    }
}
