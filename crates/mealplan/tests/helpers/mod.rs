use std::{path::PathBuf, str::FromStr};

use nutriplan_mealplan::SqliteStore;
use nutriplan_shared::mealplan::{DayKey, DayPlan, DietPlan, Goal, Macros, MealEntry};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    nutriplan_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(SqliteStore::new(pool))
}

#[allow(dead_code)]
pub fn meal(id: &str, calories: f64) -> MealEntry {
    MealEntry {
        id: id.to_owned(),
        name: format!("meal {id}"),
        description: Some("test meal".to_owned()),
        calories,
        protein: 20.0,
        carbs: 30.0,
        fat: 10.0,
    }
}

/// Monday = {breakfast: [a], lunch: [b, c], dinner: [], snacks: []}
#[allow(dead_code)]
pub fn monday_plan(owner_id: &str) -> DietPlan {
    let mut plan = DietPlan::new(
        owner_id,
        "balanced week",
        Goal::Maintenance,
        Macros {
            calories: 2200.0,
            protein: 140.0,
            carbs: 250.0,
            fat: 70.0,
        },
    );
    plan.weekly_plan.insert(
        DayKey::Monday,
        DayPlan {
            breakfast: vec![meal("a", 350.0)],
            lunch: vec![meal("b", 600.0), meal("c", 200.0)],
            ..Default::default()
        },
    );
    plan
}
