use nutriplan_shared::mealplan::{DayKey, DayPlan, DietPlan, MealCategory, MealEntry, finite};
use validator::Validate;

#[derive(Validate, Clone, Debug, Default)]
pub struct MealInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub calories: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub protein: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub carbs: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    pub fat: f64,
}

impl MealInput {
    pub fn into_entry(self) -> nutriplan_shared::Result<MealEntry> {
        self.validate()?;

        Ok(MealEntry {
            id: ulid::Ulid::new().to_string(),
            name: self.name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        })
    }
}

pub fn day_plan_for(plan: &DietPlan, day: DayKey) -> Option<&DayPlan> {
    plan.day_plan_for(day)
}

/// Meals of a category, empty when the day has no plan.
pub fn meals_of(day_plan: Option<&DayPlan>, category: MealCategory) -> &[MealEntry] {
    match day_plan {
        Some(day_plan) => day_plan.meals(category),
        None => &[],
    }
}

/// Returns a copy of `plan` with `meal` appended to the day/category slot.
///
/// A day without a plan is first initialised with four empty categories. The
/// caller's plan is left untouched.
pub fn add_meal_to_slot(
    plan: &DietPlan,
    day: DayKey,
    category: MealCategory,
    meal: MealEntry,
) -> nutriplan_shared::Result<DietPlan> {
    meal.validate()?;

    if let Some((day, category, _)) = plan.find_meal(&meal.id) {
        nutriplan_shared::user!("meal {} already planned on {day} {category}", meal.id);
    }

    let mut plan = plan.clone();
    plan.weekly_plan
        .entry(day)
        .or_default()
        .meals_mut(category)
        .push(meal);

    Ok(plan)
}
