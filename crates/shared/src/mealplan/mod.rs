mod lenient;

use std::{collections::BTreeMap, ops::Add};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::{Validate, ValidationError};

/// Canonical weekday of a plan, independent of any calendar date.
///
/// Declaration order is the domain week order (Monday first) and is what
/// `Ord` and [`DayKey::index`] follow.
#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
        DayKey::Sunday,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snacks,
    ];
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    WeightGain,
    MuscleGain,
    #[default]
    Maintenance,
    Custom,
}

/// NaN and infinities pass a `min` range check and do not survive JSON.
pub fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }

    Err(ValidationError::new("finite"))
}

/// Calories (kcal) and macronutrients (grams).
#[derive(Validate, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Macros {
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub calories: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub protein: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub carbs: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub fat: f64,
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Self) -> Self::Output {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::default(), Add::add)
    }
}

#[derive(Validate, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MealEntry {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub calories: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub protein: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub carbs: f64,
    #[validate(range(min = 0.0), custom(function = "finite"))]
    #[serde(default)]
    pub fat: f64,
}

impl MealEntry {
    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// The four meal lists of one day. Insertion order is display order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DayPlan {
    #[serde(default, deserialize_with = "lenient::meals")]
    pub breakfast: Vec<MealEntry>,
    #[serde(default, deserialize_with = "lenient::meals")]
    pub lunch: Vec<MealEntry>,
    #[serde(default, deserialize_with = "lenient::meals")]
    pub dinner: Vec<MealEntry>,
    #[serde(default, deserialize_with = "lenient::meals")]
    pub snacks: Vec<MealEntry>,
}

impl DayPlan {
    pub fn meals(&self, category: MealCategory) -> &[MealEntry] {
        match category {
            MealCategory::Breakfast => &self.breakfast,
            MealCategory::Lunch => &self.lunch,
            MealCategory::Dinner => &self.dinner,
            MealCategory::Snacks => &self.snacks,
        }
    }

    pub fn meals_mut(&mut self, category: MealCategory) -> &mut Vec<MealEntry> {
        match category {
            MealCategory::Breakfast => &mut self.breakfast,
            MealCategory::Lunch => &mut self.lunch,
            MealCategory::Dinner => &mut self.dinner,
            MealCategory::Snacks => &mut self.snacks,
        }
    }

    /// Every meal of the day with its category, in category then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MealCategory, &MealEntry)> {
        MealCategory::ALL
            .into_iter()
            .flat_map(move |category| self.meals(category).iter().map(move |m| (category, m)))
    }

    pub fn total_meals(&self) -> usize {
        MealCategory::ALL
            .iter()
            .map(|category| self.meals(*category).len())
            .sum()
    }

    pub fn contains(&self, category: MealCategory, meal_id: &str) -> bool {
        self.meals(category).iter().any(|m| m.id == meal_id)
    }

    pub fn planned_macros(&self) -> Macros {
        self.iter().map(|(_, meal)| meal.macros()).sum()
    }
}

/// Weekly diet plan, the aggregate root. Days are sparse: a missing key means
/// no plan for that day, which differs from a day with zero meals.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DietPlan {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub targets: Macros,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::week")]
    pub weekly_plan: BTreeMap<DayKey, DayPlan>,
    #[serde(default)]
    pub created_at: u64,
}

impl DietPlan {
    pub fn new(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        goal: Goal,
        targets: Macros,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            goal,
            targets,
            is_active: false,
            weekly_plan: BTreeMap::new(),
            created_at: crate::unix_now(),
        }
    }

    pub fn day_plan_for(&self, day: DayKey) -> Option<&DayPlan> {
        self.weekly_plan.get(&day)
    }

    /// Finds a meal anywhere in the plan.
    pub fn find_meal(&self, meal_id: &str) -> Option<(DayKey, MealCategory, &MealEntry)> {
        self.weekly_plan.iter().find_map(|(day, plan)| {
            plan.iter()
                .find(|(_, meal)| meal.id == meal_id)
                .map(|(category, meal)| (*day, category, meal))
        })
    }

    /// Parses a plan from JSON, degrading malformed nested data to empty.
    /// A document that is not a plan at all is bad input.
    pub fn from_json(value: &str) -> crate::Result<Self> {
        serde_json::from_str(value)
            .map_err(|err| crate::Error::User(format!("invalid plan: {err}")))
    }
}

/// Decodes a stored weekly plan. Invalid JSON is treated as a plan without days.
pub fn weekly_plan_from_json(value: &str) -> BTreeMap<DayKey, DayPlan> {
    #[derive(Deserialize)]
    struct WeeklyPlan(#[serde(deserialize_with = "lenient::week")] BTreeMap<DayKey, DayPlan>);

    serde_json::from_str::<WeeklyPlan>(value)
        .map(|plan| plan.0)
        .unwrap_or_default()
}
