//! Opening the connection to the backing SurrealDB instance.
//!
//! The driver handle is cheap to clone and internally pooled, so the
//! server opens one connection at startup and hands clones to every
//! repository. There is no wrapper type; repositories take the handle
//! directly.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings for the backing store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, host and port only (e.g. `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "ems".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Open a WebSocket connection, authenticate as root, and select the
/// configured namespace and database.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, DbError> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "connecting to surrealdb"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    info!("surrealdb connection ready");

    Ok(db)
}
