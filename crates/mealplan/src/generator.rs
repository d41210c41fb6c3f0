use nutriplan_shared::{
    Result,
    mealplan::{DayKey, Goal, Macros, MealCategory},
};

use crate::MealInput;

/// What the generator is asked for: one meal for a given slot of a plan.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub owner_id: String,
    pub goal: Goal,
    pub day: DayKey,
    pub category: MealCategory,
    pub targets: Macros,
    /// Daily targets minus what the day already plans, floored at zero.
    pub remaining: Macros,
    pub prompt: Option<String>,
}

#[derive(Clone, Debug)]
pub enum Generation {
    Meal(MealInput),
    /// Free text returned when no structured meal could be produced.
    Fallback(String),
}

/// Recipe generation backend.
#[async_trait::async_trait]
pub trait MealGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<Generation>;
}

pub fn remaining(targets: Macros, planned: Macros) -> Macros {
    Macros {
        calories: (targets.calories - planned.calories).max(0.0),
        protein: (targets.protein - planned.protein).max(0.0),
        carbs: (targets.carbs - planned.carbs).max(0.0),
        fat: (targets.fat - planned.fat).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_is_floored() {
        let targets = Macros {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 60.0,
        };
        let planned = Macros {
            calories: 2200.0,
            protein: 100.0,
            carbs: 50.0,
            fat: 60.0,
        };

        assert_eq!(
            remaining(targets, planned),
            Macros {
                calories: 0.0,
                protein: 50.0,
                carbs: 150.0,
                fat: 0.0,
            }
        );
    }
}
