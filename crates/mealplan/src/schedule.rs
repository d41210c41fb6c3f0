use nutriplan_shared::{
    CompletionRecord,
    mealplan::{DayKey, DietPlan, Macros, MealCategory, MealEntry},
};
use serde::Serialize;
use time::Date;

use crate::{Stats, progress::completed_meals};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ScheduledMeal {
    pub meal: MealEntry,
    pub completed: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CategorySchedule {
    pub category: MealCategory,
    pub meals: Vec<ScheduledMeal>,
    pub stats: Stats,
}

/// What a day of a plan looks like on a concrete date.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DaySchedule {
    pub day: DayKey,
    pub date: Date,
    /// False when the plan has nothing for this day at all.
    pub has_plan: bool,
    pub categories: Vec<CategorySchedule>,
    pub stats: Stats,
    pub planned: Macros,
    pub consumed: Macros,
}

impl DaySchedule {
    pub fn category(&self, category: MealCategory) -> Option<&CategorySchedule> {
        self.categories.iter().find(|c| c.category == category)
    }
}

pub fn day_schedule(
    plan: &DietPlan,
    day: DayKey,
    date: Date,
    completions: &[CompletionRecord],
) -> DaySchedule {
    let day_plan = plan.day_plan_for(day);
    let completed = completed_meals(day, completions);

    let categories = MealCategory::ALL
        .into_iter()
        .map(|category| {
            let meals = crate::meals_of(day_plan, category)
                .iter()
                .map(|meal| ScheduledMeal {
                    completed: completed.contains(&(category, meal.id.as_str())),
                    meal: meal.clone(),
                })
                .collect::<Vec<_>>();

            let stats = Stats {
                total: meals.len(),
                completed: meals.iter().filter(|m| m.completed).count(),
            };

            CategorySchedule {
                category,
                meals,
                stats,
            }
        })
        .collect::<Vec<_>>();

    let stats = categories
        .iter()
        .fold(Stats::default(), |acc, c| acc + c.stats);

    let consumed: Macros = categories
        .iter()
        .flat_map(|c| c.meals.iter())
        .filter(|m| m.completed)
        .map(|m| m.meal.macros())
        .sum();

    DaySchedule {
        day,
        date,
        has_plan: day_plan.is_some(),
        planned: day_plan.map(|d| d.planned_macros()).unwrap_or_default(),
        consumed,
        categories,
        stats,
    }
}
