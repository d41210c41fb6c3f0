use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use nutriplan_shared::{
    CompletionKey, CompletionRecord, Error, Result,
    mealplan::{DayKey, DietPlan},
};
use time::Date;
use tokio::sync::RwLock;

use crate::PlanStore;

#[derive(Default)]
struct Inner {
    plans: HashMap<String, DietPlan>,
    completions: BTreeMap<CompletionKey, Option<u64>>,
}

/// In-process store, useful for tests and for running without a database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails as if the backend were unreachable.
    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::unavailable(anyhow::anyhow!(
                "memory store is unavailable"
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl PlanStore for MemoryStore {
    async fn get_plan(&self, id: &str) -> Result<Option<DietPlan>> {
        self.check()?;

        Ok(self.inner.read().await.plans.get(id).cloned())
    }

    async fn active_plan(&self, owner_id: &str) -> Result<Option<DietPlan>> {
        self.check()?;

        Ok(self
            .inner
            .read()
            .await
            .plans
            .values()
            .find(|p| p.owner_id == owner_id && p.is_active)
            .cloned())
    }

    async fn insert_plan(&self, plan: &DietPlan) -> Result<()> {
        self.check()?;

        let mut inner = self.inner.write().await;
        if inner.plans.contains_key(&plan.id) {
            nutriplan_shared::user!("plan {} already exists", plan.id);
        }

        inner.plans.insert(plan.id.to_owned(), plan.clone());

        Ok(())
    }

    async fn update_plan(&self, plan: &DietPlan) -> Result<bool> {
        self.check()?;

        let mut inner = self.inner.write().await;
        let Some(stored) = inner.plans.get_mut(&plan.id) else {
            return Ok(false);
        };

        *stored = plan.clone();

        Ok(true)
    }

    async fn set_active(&self, owner_id: &str, plan_id: &str) -> Result<bool> {
        self.check()?;

        let mut inner = self.inner.write().await;
        let exists = inner
            .plans
            .get(plan_id)
            .is_some_and(|p| p.owner_id == owner_id);

        if !exists {
            return Ok(false);
        }

        for plan in inner.plans.values_mut().filter(|p| p.owner_id == owner_id) {
            plan.is_active = plan.id == plan_id;
        }

        Ok(true)
    }

    async fn get_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>> {
        self.check()?;

        Ok(self
            .inner
            .read()
            .await
            .completions
            .get(key)
            .map(|completed_at| CompletionRecord {
                key: key.clone(),
                completed_at: *completed_at,
            }))
    }

    async fn upsert_completion(&self, record: &CompletionRecord) -> Result<()> {
        self.check()?;

        self.inner
            .write()
            .await
            .completions
            .insert(record.key.clone(), record.completed_at);

        Ok(())
    }

    async fn query_completions(
        &self,
        owner_id: &str,
        plan_id: &str,
        day: DayKey,
        date: Date,
    ) -> Result<Vec<CompletionRecord>> {
        self.check()?;

        Ok(self
            .inner
            .read()
            .await
            .completions
            .iter()
            .filter(|(key, _)| {
                key.owner_id == owner_id
                    && key.plan_id == plan_id
                    && key.day == day
                    && key.date == date
            })
            .map(|(key, completed_at)| CompletionRecord {
                key: key.clone(),
                completed_at: *completed_at,
            })
            .collect())
    }

    async fn toggle_completion(&self, key: &CompletionKey, at: u64) -> Result<CompletionRecord> {
        self.check()?;

        let mut inner = self.inner.write().await;
        let completed_at = match inner.completions.get(key) {
            Some(Some(_)) => None,
            _ => Some(at),
        };
        inner.completions.insert(key.clone(), completed_at);

        Ok(CompletionRecord {
            key: key.clone(),
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriplan_shared::mealplan::{Goal, Macros, MealCategory};
    use time::macros::date;

    fn key(meal_id: &str) -> CompletionKey {
        CompletionKey {
            owner_id: "john".to_owned(),
            plan_id: "plan".to_owned(),
            date: date!(2024 - 01 - 01),
            day: DayKey::Monday,
            category: MealCategory::Breakfast,
            meal_id: meal_id.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_toggle_completion_cycles() -> Result<()> {
        let store = MemoryStore::new();

        assert!(store.get_completion(&key("a")).await?.is_none());
        assert!(store.toggle_completion(&key("a"), 1).await?.is_completed());
        assert!(!store.toggle_completion(&key("a"), 2).await?.is_completed());
        assert_eq!(
            store.toggle_completion(&key("a"), 3).await?.completed_at,
            Some(3)
        );

        let records = store
            .query_completions("john", "plan", DayKey::Monday, date!(2024 - 01 - 01))
            .await?;
        assert_eq!(records.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_active_keeps_one_active_plan() -> Result<()> {
        let store = MemoryStore::new();
        let first = DietPlan::new("john", "first", Goal::WeightLoss, Macros::default());
        let second = DietPlan::new("john", "second", Goal::WeightGain, Macros::default());
        let other = DietPlan::new("jane", "other", Goal::Custom, Macros::default());
        for plan in [&first, &second, &other] {
            store.insert_plan(plan).await?;
        }

        assert!(store.set_active("john", &first.id).await?);
        assert!(store.set_active("jane", &other.id).await?);
        assert!(store.set_active("john", &second.id).await?);
        assert!(!store.set_active("jane", &second.id).await?);

        assert_eq!(store.active_plan("john").await?.unwrap().id, second.id);
        assert!(!store.get_plan(&first.id).await?.unwrap().is_active);
        assert_eq!(store.active_plan("jane").await?.unwrap().id, other.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_retryable() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = store.toggle_completion(&key("a"), 1).await.unwrap_err();
        assert!(err.is_retryable());

        store.set_unavailable(false);
        assert!(store.get_completion(&key("a")).await.unwrap().is_none());
    }
}
