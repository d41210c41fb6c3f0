use std::{collections::HashSet, fmt, ops::Add};

use nutriplan_shared::{
    CompletionRecord,
    mealplan::{DayKey, DayPlan, DietPlan, MealCategory},
};
use serde::Serialize;
use time::Date;

/// Completed over total meals. `completed <= total` always holds.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
}

impl Stats {
    pub fn percentage(&self) -> u8 {
        percentage(*self)
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Self) -> Self::Output {
        Stats {
            total: self.total + rhs.total,
            completed: self.completed + rhs.completed,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Rounded completion percentage in `0..=100`, zero for an empty day.
pub fn percentage(stats: Stats) -> u8 {
    if stats.total == 0 {
        return 0;
    }

    let value = (stats.completed as f64 * 100.0 / stats.total as f64).round();
    value.clamp(0.0, 100.0) as u8
}

/// (category, meal id) pairs currently completed for `day`.
pub(crate) fn completed_meals(
    day: DayKey,
    completions: &[CompletionRecord],
) -> HashSet<(MealCategory, &str)> {
    completions
        .iter()
        .filter(|record| record.is_completed() && record.key.day == day)
        .map(|record| (record.key.category, record.key.meal_id.as_str()))
        .collect()
}

fn count(
    day_plan: Option<&DayPlan>,
    category: MealCategory,
    completed: &HashSet<(MealCategory, &str)>,
) -> Stats {
    let meals = crate::meals_of(day_plan, category);

    Stats {
        total: meals.len(),
        completed: meals
            .iter()
            .filter(|meal| completed.contains(&(category, meal.id.as_str())))
            .count(),
    }
}

/// Stats of one category. Completions for meals no longer in the plan are ignored.
pub fn category_stats(
    day_plan: Option<&DayPlan>,
    day: DayKey,
    category: MealCategory,
    completions: &[CompletionRecord],
) -> Stats {
    count(day_plan, category, &completed_meals(day, completions))
}

/// Stats of a whole day across the four categories, zero when the day is absent.
pub fn daily_stats(plan: &DietPlan, day: DayKey, completions: &[CompletionRecord]) -> Stats {
    let day_plan = plan.day_plan_for(day);
    let completed = completed_meals(day, completions);

    MealCategory::ALL
        .into_iter()
        .map(|category| count(day_plan, category, &completed))
        .fold(Stats::default(), Add::add)
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct DayProgress {
    pub day: DayKey,
    pub date: Date,
    pub stats: Stats,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct WeekStats {
    pub days: Vec<DayProgress>,
    pub total: Stats,
}

impl WeekStats {
    pub fn from_days(days: Vec<DayProgress>) -> Self {
        let total = days.iter().map(|d| d.stats).fold(Stats::default(), Add::add);

        Self { days, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriplan_shared::{
        CompletionKey,
        mealplan::{Goal, Macros, MealEntry},
    };
    use time::macros::date;

    fn meal(id: &str) -> MealEntry {
        MealEntry {
            id: id.to_owned(),
            name: id.to_owned(),
            description: None,
            calories: 100.0,
            protein: 1.0,
            carbs: 1.0,
            fat: 1.0,
        }
    }

    fn record(day: DayKey, category: MealCategory, meal_id: &str, done: bool) -> CompletionRecord {
        CompletionRecord {
            key: CompletionKey {
                owner_id: "john".to_owned(),
                plan_id: "plan".to_owned(),
                date: date!(2024 - 01 - 01),
                day,
                category,
                meal_id: meal_id.to_owned(),
            },
            completed_at: done.then_some(1),
        }
    }

    fn monday_plan() -> DietPlan {
        let mut plan = DietPlan::new("john", "plan", Goal::Maintenance, Macros::default());
        plan.weekly_plan.insert(
            DayKey::Monday,
            DayPlan {
                breakfast: vec![meal("a")],
                lunch: vec![meal("b"), meal("c")],
                ..Default::default()
            },
        );
        plan
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(Stats { total: 0, completed: 0 }), 0);
        assert_eq!(percentage(Stats { total: 4, completed: 2 }), 50);
        assert_eq!(percentage(Stats { total: 3, completed: 1 }), 33);
        assert_eq!(percentage(Stats { total: 3, completed: 2 }), 67);
        assert_eq!(percentage(Stats { total: 5, completed: 5 }), 100);
    }

    #[test]
    fn test_daily_stats_counts_current_meals() {
        let plan = monday_plan();

        assert_eq!(
            daily_stats(&plan, DayKey::Monday, &[]),
            Stats { total: 3, completed: 0 }
        );

        let completions = [
            record(DayKey::Monday, MealCategory::Breakfast, "a", true),
            record(DayKey::Monday, MealCategory::Lunch, "c", false),
        ];
        let stats = daily_stats(&plan, DayKey::Monday, &completions);
        assert_eq!(stats, Stats { total: 3, completed: 1 });
        assert_eq!(stats.percentage(), 33);
    }

    #[test]
    fn test_stale_or_misplaced_completions_are_ignored() {
        let plan = monday_plan();
        let completions = [
            record(DayKey::Monday, MealCategory::Dinner, "removed", true),
            record(DayKey::Monday, MealCategory::Dinner, "a", true),
            record(DayKey::Tuesday, MealCategory::Lunch, "b", true),
        ];

        let stats = daily_stats(&plan, DayKey::Monday, &completions);
        assert_eq!(stats, Stats { total: 3, completed: 0 });
        assert!(stats.completed <= stats.total);
    }

    #[test]
    fn test_absent_day_is_zero() {
        let plan = monday_plan();
        let completions = [record(DayKey::Sunday, MealCategory::Lunch, "b", true)];

        assert_eq!(daily_stats(&plan, DayKey::Sunday, &completions), Stats::default());
    }

    #[test]
    fn test_category_stats_display() {
        let plan = monday_plan();
        let completions = [record(DayKey::Monday, MealCategory::Lunch, "b", true)];
        let monday = plan.day_plan_for(DayKey::Monday);

        let lunch = category_stats(monday, DayKey::Monday, MealCategory::Lunch, &completions);
        assert_eq!(lunch.to_string(), "1/2");

        let dinner = category_stats(monday, DayKey::Monday, MealCategory::Dinner, &completions);
        assert_eq!(dinner.to_string(), "0/0");
    }

    #[test]
    fn test_week_stats_total() {
        let days = vec![
            DayProgress {
                day: DayKey::Monday,
                date: date!(2024 - 01 - 01),
                stats: Stats { total: 3, completed: 1 },
            },
            DayProgress {
                day: DayKey::Tuesday,
                date: date!(2024 - 01 - 02),
                stats: Stats { total: 2, completed: 2 },
            },
        ];

        let week = WeekStats::from_days(days);
        assert_eq!(week.total, Stats { total: 5, completed: 3 });
        assert_eq!(week.total.percentage(), 60);
    }
}
