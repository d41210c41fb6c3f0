mod diet_plan_create_owner_idx;
mod diet_plan_create_table;
mod meal_completion_create_table;
mod meal_completion_create_plan_date_idx;

use sqlx_migrator::vec_box;

pub struct M0001;

sqlx_migrator::sqlite_migration!(
    M0001,
    "nutriplan",
    "m0001",
    vec_box![],
    vec_box![
        diet_plan_create_table::Operation,
        diet_plan_create_owner_idx::Operation,
        meal_completion_create_table::Operation,
        meal_completion_create_plan_date_idx::Operation
    ]
);
