use clap::Subcommand;
use nutriplan::Config;
use nutriplan_mealplan::{AddMealInput, Command, MealInput};
use nutriplan_shared::mealplan::{DayKey, DietPlan, MealCategory};

#[derive(Subcommand)]
pub enum PlanCommand {
    /// Store a plan from a JSON file
    Import {
        file: String,

        /// Make it the owner's active plan
        #[arg(long)]
        activate: bool,
    },
    /// Make a plan the owner's active plan
    Activate {
        id: String,

        #[arg(long)]
        owner: String,
    },
    /// Append a meal to a day/category slot
    AddMeal {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        plan: String,

        #[arg(long)]
        day: DayKey,

        #[arg(long)]
        category: MealCategory,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value_t = 0.0)]
        calories: f64,

        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        #[arg(long, default_value_t = 0.0)]
        fat: f64,
    },
}

pub async fn run(config: Config, command: PlanCommand) -> anyhow::Result<()> {
    let store = super::open_store(&config).await?;
    let plans = Command::new(store);

    match command {
        PlanCommand::Import { file, activate } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let plan = DietPlan::from_json(&content)?;
            let id = plans.import(plan, activate).await?;

            println!("{id}");
        }
        PlanCommand::Activate { id, owner } => {
            if !plans.activate(&id, &owner).await? {
                anyhow::bail!("plan {id} not found for {owner}");
            }
        }
        PlanCommand::AddMeal {
            owner,
            plan,
            day,
            category,
            name,
            description,
            calories,
            protein,
            carbs,
            fat,
        } => {
            let input = AddMealInput {
                plan_id: plan.to_owned(),
                day,
                category,
                meal: MealInput {
                    name,
                    description,
                    calories,
                    protein,
                    carbs,
                    fat,
                },
            };

            let Some(updated) = plans.add_meal(input, &owner).await? else {
                anyhow::bail!("plan {plan} not found for {owner}");
            };

            super::print_json(&updated.day_plan_for(day))?;
        }
    }

    Ok(())
}
