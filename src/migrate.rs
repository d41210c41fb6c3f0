//! Database migration utilities

use crate::Config;
use sqlx::{ConnectOptions, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;

/// Apply every pending migration, creating the database file when missing.
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let options =
        SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let mut conn = options.connect().await?;

    nutriplan_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    tracing::info!(url = %config.database.url, "database migrated");

    Ok(())
}
