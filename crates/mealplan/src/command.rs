use std::collections::HashSet;

use nutriplan_shared::{
    Result,
    mealplan::{DayKey, DietPlan, MealCategory},
};
use validator::Validate;

use crate::{GenerateRequest, Generation, MealGenerator, MealInput, PlanStore, add_meal_to_slot};

pub struct AddMealInput {
    pub plan_id: String,
    pub day: DayKey,
    pub category: MealCategory,
    pub meal: MealInput,
}

pub struct GenerateMealInput {
    pub plan_id: String,
    pub day: DayKey,
    pub category: MealCategory,
    pub prompt: Option<String>,
}

/// Plan writes. Every method takes the id of the requesting owner; a plan that
/// does not exist or belongs to someone else is reported as `None`.
#[derive(Clone)]
pub struct Command<S> {
    store: S,
}

impl<S: PlanStore> Command<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn load(
        &self,
        id: impl AsRef<str>,
        request_by: impl AsRef<str>,
    ) -> Result<Option<DietPlan>> {
        let plan = self.store.get_plan(id.as_ref()).await?;

        Ok(plan.filter(|p| p.owner_id == request_by.as_ref()))
    }

    pub async fn active(&self, request_by: impl AsRef<str>) -> Result<Option<DietPlan>> {
        self.store.active_plan(request_by.as_ref()).await
    }

    /// Stores a plan built elsewhere, returning its id.
    pub async fn import(&self, plan: DietPlan, activate: bool) -> Result<String> {
        plan.targets.validate()?;

        if plan.id.is_empty() || plan.owner_id.is_empty() {
            nutriplan_shared::user!("plan id and owner are required");
        }

        if plan.name.trim().is_empty() {
            nutriplan_shared::user!("plan name is required");
        }

        let mut meal_ids = HashSet::new();
        for (day, day_plan) in &plan.weekly_plan {
            for (category, meal) in day_plan.iter() {
                meal.validate()?;

                if !meal_ids.insert(meal.id.as_str()) {
                    nutriplan_shared::user!(
                        "meal {} planned twice, again on {day} {category}",
                        meal.id
                    );
                }
            }
        }

        let plan = DietPlan {
            is_active: false,
            ..plan
        };

        self.store.insert_plan(&plan).await?;

        if activate {
            self.store.set_active(&plan.owner_id, &plan.id).await?;
        }

        tracing::info!(plan_id = %plan.id, owner_id = %plan.owner_id, activate, "plan imported");

        Ok(plan.id)
    }

    pub async fn activate(
        &self,
        id: impl AsRef<str>,
        request_by: impl AsRef<str>,
    ) -> Result<bool> {
        let activated = self
            .store
            .set_active(request_by.as_ref(), id.as_ref())
            .await?;

        if activated {
            tracing::info!(plan_id = id.as_ref(), owner_id = request_by.as_ref(), "plan activated");
        }

        Ok(activated)
    }

    pub async fn add_meal(
        &self,
        input: AddMealInput,
        request_by: impl AsRef<str>,
    ) -> Result<Option<DietPlan>> {
        let entry = input.meal.into_entry()?;

        let Some(plan) = self.load(&input.plan_id, request_by).await? else {
            return Ok(None);
        };

        let plan = add_meal_to_slot(&plan, input.day, input.category, entry)?;
        if !self.store.update_plan(&plan).await? {
            return Ok(None);
        }

        tracing::info!(
            plan_id = %plan.id,
            day = %input.day,
            category = %input.category,
            "meal added to plan"
        );

        Ok(Some(plan))
    }

    /// Asks `generator` for a meal and appends it to the slot. A fallback
    /// answer leaves the plan as it was; a generator failure is returned.
    pub async fn generate_meal<G: MealGenerator>(
        &self,
        generator: &G,
        input: GenerateMealInput,
        request_by: impl AsRef<str>,
    ) -> Result<Option<(DietPlan, Generation)>> {
        let Some(plan) = self.load(&input.plan_id, request_by).await? else {
            return Ok(None);
        };

        let planned = plan
            .day_plan_for(input.day)
            .map(|d| d.planned_macros())
            .unwrap_or_default();

        let request = GenerateRequest {
            owner_id: plan.owner_id.to_owned(),
            goal: plan.goal,
            day: input.day,
            category: input.category,
            targets: plan.targets,
            remaining: crate::remaining(plan.targets, planned),
            prompt: input.prompt,
        };

        let generation = generator.generate(&request).await?;

        let meal = match &generation {
            Generation::Meal(meal) => meal.clone(),
            Generation::Fallback(text) => {
                tracing::warn!(plan_id = %plan.id, fallback = %text, "generator returned no meal");
                return Ok(Some((plan, generation)));
            }
        };

        let plan = add_meal_to_slot(&plan, input.day, input.category, meal.into_entry()?)?;
        if !self.store.update_plan(&plan).await? {
            return Ok(None);
        }

        tracing::info!(
            plan_id = %plan.id,
            day = %input.day,
            category = %input.category,
            "generated meal added to plan"
        );

        Ok(Some((plan, generation)))
    }
}
