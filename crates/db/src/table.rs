use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum DietPlan {
    Table,
    Id,
    OwnerId,
    Name,
    Goal,
    Calories,
    Protein,
    Carbs,
    Fat,
    IsActive,
    WeeklyPlan,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum MealCompletion {
    Table,
    OwnerId,
    PlanId,
    Date,
    Day,
    Category,
    MealId,
    CompletedAt,
    UpdatedAt,
}
