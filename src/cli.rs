use nutriplan::Config;
use nutriplan_mealplan::{Command, PlanStore, SqliteStore};
use nutriplan_shared::mealplan::DietPlan;
use serde::Serialize;
use time::{Date, macros::format_description};

pub mod plan;
pub mod tracking;

pub async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let write_db = nutriplan::create_write_pool(&config.database.url).await?;
    let read_db =
        nutriplan::create_read_pool(&config.database.url, config.database.max_connections)
            .await?;

    Ok(SqliteStore::with_pools(read_db, write_db))
}

/// `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// The requested plan, or the owner's active one when no id is given.
pub async fn resolve_plan<S: PlanStore>(
    store: S,
    owner: &str,
    plan: Option<&str>,
) -> anyhow::Result<DietPlan> {
    let command = Command::new(store);
    let found = match plan {
        Some(id) => command.load(id, owner).await?,
        None => command.active(owner).await?,
    };

    match (found, plan) {
        (Some(plan), _) => Ok(plan),
        (None, Some(id)) => anyhow::bail!("plan {id} not found for {owner}"),
        (None, None) => anyhow::bail!("{owner} has no active plan"),
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
