use nutriplan_shared::{
    CompletionKey, CompletionRecord, Result,
    mealplan::{DayKey, DietPlan},
};
use time::Date;

/// Persistence port for plans and the completion ledger.
///
/// A missing plan or record is `Ok(None)`; `Err` is reserved for a backend
/// that could not answer.
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    async fn get_plan(&self, id: &str) -> Result<Option<DietPlan>>;

    /// The owner's active plan, if any.
    async fn active_plan(&self, owner_id: &str) -> Result<Option<DietPlan>>;

    async fn insert_plan(&self, plan: &DietPlan) -> Result<()>;

    /// Replaces the stored plan as a whole. Returns false when it does not exist.
    async fn update_plan(&self, plan: &DietPlan) -> Result<bool>;

    /// Marks `plan_id` active and every other plan of `owner_id` inactive.
    async fn set_active(&self, owner_id: &str, plan_id: &str) -> Result<bool>;

    async fn get_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>>;

    async fn upsert_completion(&self, record: &CompletionRecord) -> Result<()>;

    /// Every record, completed or not, for one plan day on one calendar date.
    async fn query_completions(
        &self,
        owner_id: &str,
        plan_id: &str,
        day: DayKey,
        date: Date,
    ) -> Result<Vec<CompletionRecord>>;

    /// Creates the record as completed or flips an existing one.
    ///
    /// The default reads then writes; adapters that can should override it
    /// with a single atomic operation keyed on the composite key.
    async fn toggle_completion(&self, key: &CompletionKey, at: u64) -> Result<CompletionRecord> {
        let record = match self.get_completion(key).await? {
            Some(record) => record.toggled(at),
            None => CompletionRecord::completed(key.clone(), at),
        };

        self.upsert_completion(&record).await?;

        Ok(record)
    }
}
