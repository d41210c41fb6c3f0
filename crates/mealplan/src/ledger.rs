use nutriplan_shared::{
    CompletionKey, CompletionRecord, Result,
    mealplan::{DayKey, DietPlan, MealCategory},
    unix_now, week_dates,
};
use time::Date;
use validator::Validate;

use crate::{DayProgress, DaySchedule, PlanStore, Stats, WeekStats, daily_stats, day_schedule};

#[derive(Validate, Clone, Debug)]
pub struct ToggleInput {
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1))]
    pub plan_id: String,
    pub day: DayKey,
    pub category: MealCategory,
    #[validate(length(min = 1))]
    pub meal_id: String,
    /// Calendar date of the completion, today when unset.
    pub date: Option<Date>,
}

/// Completion ledger over a [`PlanStore`].
#[derive(Clone)]
pub struct Ledger<S> {
    store: S,
    timezone: String,
}

impl<S: PlanStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timezone: "UTC".to_owned(),
        }
    }

    /// Timezone used to resolve "today".
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> Date {
        nutriplan_shared::today(&self.timezone)
    }

    /// Marks a meal completed on its first call, then flips between
    /// incomplete and completed. Store failures are returned, never hidden.
    #[tracing::instrument(skip_all, fields(owner_id = %input.owner_id, plan_id = %input.plan_id, day = %input.day, category = %input.category, meal_id = %input.meal_id))]
    pub async fn toggle(&self, input: ToggleInput) -> Result<CompletionRecord> {
        input.validate()?;

        let key = CompletionKey {
            date: input.date.unwrap_or_else(|| self.today()),
            owner_id: input.owner_id,
            plan_id: input.plan_id,
            day: input.day,
            category: input.category,
            meal_id: input.meal_id,
        };

        let record = self.store.toggle_completion(&key, unix_now()).await?;

        tracing::info!(
            date = %key.date,
            completed = record.is_completed(),
            "meal completion toggled"
        );

        Ok(record)
    }

    /// Currently completed records of one plan day on exactly `date`.
    pub async fn completions_for_day(
        &self,
        owner_id: &str,
        plan_id: &str,
        day: DayKey,
        date: Date,
    ) -> Result<Vec<CompletionRecord>> {
        if owner_id.is_empty() || plan_id.is_empty() {
            nutriplan_shared::user!("owner and plan ids are required");
        }

        let records = self
            .store
            .query_completions(owner_id, plan_id, day, date)
            .await?;

        tracing::debug!(owner_id, plan_id, %day, %date, records = records.len(), "completions loaded");

        Ok(records
            .into_iter()
            .filter(|record| record.is_completed() && record.key.date == date)
            .collect())
    }

    pub async fn is_completed(&self, key: &CompletionKey) -> Result<bool> {
        key.validate()?;

        Ok(self
            .store
            .get_completion(key)
            .await?
            .is_some_and(|record| record.is_completed()))
    }

    pub async fn daily_stats(&self, plan: &DietPlan, day: DayKey, date: Date) -> Result<Stats> {
        let completions = self
            .completions_for_day(&plan.owner_id, &plan.id, day, date)
            .await?;

        Ok(daily_stats(plan, day, &completions))
    }

    pub async fn day_schedule(
        &self,
        plan: &DietPlan,
        day: DayKey,
        date: Date,
    ) -> Result<DaySchedule> {
        let completions = self
            .completions_for_day(&plan.owner_id, &plan.id, day, date)
            .await?;

        Ok(day_schedule(plan, day, date, &completions))
    }

    /// Schedule of the day key `date` falls on.
    pub async fn schedule_for_date(&self, plan: &DietPlan, date: Date) -> Result<DaySchedule> {
        self.day_schedule(plan, nutriplan_shared::day_key(date), date)
            .await
    }

    /// Progress over the Monday to Sunday week containing `date`.
    pub async fn week_stats(&self, plan: &DietPlan, date: Date) -> Result<WeekStats> {
        let mut days = Vec::with_capacity(7);

        for (day, date) in week_dates(date) {
            days.push(DayProgress {
                day,
                date,
                stats: self.daily_stats(plan, day, date).await?,
            });
        }

        Ok(WeekStats::from_days(days))
    }
}
