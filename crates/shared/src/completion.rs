use serde::Serialize;
use time::Date;
use validator::Validate;

use crate::mealplan::{DayKey, MealCategory};

/// Composite key of the completion ledger. At most one record exists per key.
#[derive(Validate, Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompletionKey {
    #[validate(length(min = 1))]
    pub owner_id: String,
    #[validate(length(min = 1))]
    pub plan_id: String,
    /// Real calendar date the meal was eaten on, distinct from `day`.
    pub date: Date,
    pub day: DayKey,
    pub category: MealCategory,
    #[validate(length(min = 1))]
    pub meal_id: String,
}

/// `completed_at == None` means explicitly marked incomplete; a key without
/// any record was never touched.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CompletionRecord {
    pub key: CompletionKey,
    pub completed_at: Option<u64>,
}

impl CompletionRecord {
    pub fn completed(key: CompletionKey, at: u64) -> Self {
        Self {
            key,
            completed_at: Some(at),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Flips between completed (at `at`) and incomplete.
    pub fn toggled(self, at: u64) -> Self {
        let completed_at = match self.completed_at {
            Some(_) => None,
            None => Some(at),
        };

        Self {
            key: self.key,
            completed_at,
        }
    }
}
