use nutriplan::Config;
use nutriplan_mealplan::{Ledger, PlanStore, ToggleInput};
use nutriplan_shared::mealplan::{DayKey, MealCategory};
use time::Date;

fn ledger<S: PlanStore>(config: &Config, store: S) -> Ledger<S> {
    Ledger::new(store).with_timezone(&config.tracking.timezone)
}

/// Prints the schedule of `date`, today by default.
pub async fn today(
    config: Config,
    owner: String,
    plan: Option<String>,
    date: Option<Date>,
) -> anyhow::Result<()> {
    let store = super::open_store(&config).await?;
    let plan = super::resolve_plan(store.clone(), &owner, plan.as_deref()).await?;
    let ledger = ledger(&config, store);
    let date = date.unwrap_or_else(|| ledger.today());

    let schedule = ledger.schedule_for_date(&plan, date).await?;

    tracing::info!(
        plan_id = %plan.id,
        %date,
        progress = %schedule.stats,
        percentage = schedule.stats.percentage(),
        "daily progress"
    );

    super::print_json(&schedule)
}

#[allow(clippy::too_many_arguments)]
pub async fn toggle(
    config: Config,
    owner: String,
    plan: String,
    day: DayKey,
    category: MealCategory,
    meal: String,
    date: Option<Date>,
) -> anyhow::Result<()> {
    let store = super::open_store(&config).await?;
    let record = ledger(&config, store)
        .toggle(ToggleInput {
            owner_id: owner,
            plan_id: plan,
            day,
            category,
            meal_id: meal,
            date,
        })
        .await?;

    super::print_json(&record)
}

/// Prints Monday to Sunday progress of the week containing `date`.
pub async fn week(
    config: Config,
    owner: String,
    plan: Option<String>,
    date: Option<Date>,
) -> anyhow::Result<()> {
    let store = super::open_store(&config).await?;
    let plan = super::resolve_plan(store.clone(), &owner, plan.as_deref()).await?;
    let ledger = ledger(&config, store);
    let date = date.unwrap_or_else(|| ledger.today());

    let week = ledger.week_stats(&plan, date).await?;

    tracing::info!(
        plan_id = %plan.id,
        progress = %week.total,
        percentage = week.total.percentage(),
        "weekly progress"
    );

    super::print_json(&week)
}
