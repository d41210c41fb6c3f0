use nutriplan_mealplan::{Command, Ledger, PlanStore, Stats, ToggleInput};
use nutriplan_shared::{
    CompletionKey,
    mealplan::{DayKey, DietPlan, MealCategory},
};
use temp_dir::TempDir;
use time::{Date, macros::date};

mod helpers;

fn toggle_input(plan: &DietPlan, category: MealCategory, meal_id: &str, date: Date) -> ToggleInput {
    ToggleInput {
        owner_id: plan.owner_id.to_owned(),
        plan_id: plan.id.to_owned(),
        day: DayKey::Monday,
        category,
        meal_id: meal_id.to_owned(),
        date: Some(date),
    }
}

#[tokio::test]
async fn test_toggle_scenario() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    Command::new(store.clone()).import(plan.clone(), true).await?;

    let ledger = Ledger::new(store);
    let date = date!(2024 - 01 - 01);

    let stats = ledger.daily_stats(&plan, DayKey::Monday, date).await?;
    assert_eq!(stats, Stats { total: 3, completed: 0 });

    let record = ledger
        .toggle(toggle_input(&plan, MealCategory::Breakfast, "a", date))
        .await?;
    assert!(record.is_completed());

    let stats = ledger.daily_stats(&plan, DayKey::Monday, date).await?;
    assert_eq!(stats, Stats { total: 3, completed: 1 });
    assert_eq!(stats.percentage(), 33);

    Ok(())
}

#[tokio::test]
async fn test_toggle_is_reversible() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store.clone());
    let date = date!(2024 - 01 - 01);

    let key = CompletionKey {
        owner_id: plan.owner_id.to_owned(),
        plan_id: plan.id.to_owned(),
        date,
        day: DayKey::Monday,
        category: MealCategory::Lunch,
        meal_id: "b".to_owned(),
    };

    assert!(store.get_completion(&key).await?.is_none());

    for expected in [true, false, true, false] {
        let record = ledger
            .toggle(toggle_input(&plan, MealCategory::Lunch, "b", date))
            .await?;
        assert_eq!(record.is_completed(), expected);
        assert_eq!(ledger.is_completed(&key).await?, expected);
    }

    // explicitly incomplete, not untouched
    let stored = store.get_completion(&key).await?.unwrap();
    assert_eq!(stored.completed_at, None);

    let records = store
        .query_completions(&plan.owner_id, &plan.id, DayKey::Monday, date)
        .await?;
    assert_eq!(records.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_completions_are_scoped_to_calendar_date() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store);

    ledger
        .toggle(toggle_input(&plan, MealCategory::Breakfast, "a", date!(2024 - 01 - 08)))
        .await?;

    let completions = ledger
        .completions_for_day(&plan.owner_id, &plan.id, DayKey::Monday, date!(2024 - 01 - 01))
        .await?;
    assert!(completions.is_empty());

    let completions = ledger
        .completions_for_day(&plan.owner_id, &plan.id, DayKey::Monday, date!(2024 - 01 - 08))
        .await?;
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].key.date, date!(2024 - 01 - 08));

    Ok(())
}

#[tokio::test]
async fn test_removed_meal_is_not_counted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let mut plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store);
    let date = date!(2024 - 01 - 01);

    ledger
        .toggle(toggle_input(&plan, MealCategory::Lunch, "c", date))
        .await?;
    ledger
        .toggle(toggle_input(&plan, MealCategory::Lunch, "ghost", date))
        .await?;

    let stats = ledger.daily_stats(&plan, DayKey::Monday, date).await?;
    assert_eq!(stats, Stats { total: 3, completed: 1 });

    // plan edited: meal c removed
    plan.weekly_plan
        .get_mut(&DayKey::Monday)
        .unwrap()
        .lunch
        .retain(|m| m.id != "c");

    let stats = ledger.daily_stats(&plan, DayKey::Monday, date).await?;
    assert_eq!(stats, Stats { total: 2, completed: 0 });

    Ok(())
}

#[tokio::test]
async fn test_concurrent_toggles_on_distinct_meals() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store);
    let date = date!(2024 - 01 - 01);

    let results = futures::future::join_all([
        ledger.toggle(toggle_input(&plan, MealCategory::Breakfast, "a", date)),
        ledger.toggle(toggle_input(&plan, MealCategory::Lunch, "b", date)),
        ledger.toggle(toggle_input(&plan, MealCategory::Lunch, "c", date)),
    ])
    .await;

    for result in results {
        assert!(result?.is_completed());
    }

    let stats = ledger.daily_stats(&plan, DayKey::Monday, date).await?;
    assert_eq!(stats, Stats { total: 3, completed: 3 });
    assert_eq!(stats.percentage(), 100);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_toggles_on_same_meal_keep_one_record() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store.clone());
    let date = date!(2024 - 01 - 01);

    let results = futures::future::join_all(
        (0..4).map(|_| ledger.toggle(toggle_input(&plan, MealCategory::Breakfast, "a", date))),
    )
    .await;

    for result in results {
        result?;
    }

    let records = store
        .query_completions(&plan.owner_id, &plan.id, DayKey::Monday, date)
        .await?;
    assert_eq!(records.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_week_stats_over_sqlite() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store = helpers::setup_test_store(dir.child("db.sqlite3")).await?;
    let plan = helpers::monday_plan("john");
    let ledger = Ledger::new(store);

    ledger
        .toggle(toggle_input(&plan, MealCategory::Lunch, "b", date!(2024 - 01 - 01)))
        .await?;
    // previous week's Monday does not leak into this week
    ledger
        .toggle(toggle_input(&plan, MealCategory::Lunch, "c", date!(2023 - 12 - 25)))
        .await?;

    let week = ledger.week_stats(&plan, date!(2024 - 01 - 07)).await?;
    assert_eq!(week.days[0].date, date!(2024 - 01 - 01));
    assert_eq!(week.total, Stats { total: 3, completed: 1 });

    let schedule = ledger.schedule_for_date(&plan, date!(2024 - 01 - 01)).await?;
    assert_eq!(schedule.day, DayKey::Monday);
    assert_eq!(schedule.consumed.calories, 600.0);
    assert_eq!(
        schedule.category(MealCategory::Lunch).unwrap().stats.to_string(),
        "1/2"
    );

    Ok(())
}
