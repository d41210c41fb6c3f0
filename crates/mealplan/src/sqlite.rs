use nutriplan_db::table::{DietPlan as DietPlanTable, MealCompletion};
use nutriplan_shared::{
    CompletionKey, CompletionRecord, Result, date_from_unix, date_to_unix,
    mealplan::{DayKey, DietPlan, Goal, Macros, weekly_plan_from_json},
    unix_now,
};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::Date;

use crate::PlanStore;

#[derive(Default, FromRow)]
pub struct PlanRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub goal: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub is_active: bool,
    pub weekly_plan: String,
    pub created_at: i64,
}

impl From<PlanRow> for DietPlan {
    fn from(row: PlanRow) -> Self {
        DietPlan {
            weekly_plan: weekly_plan_from_json(&row.weekly_plan),
            goal: row.goal.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    plan_id = %row.id,
                    goal = %row.goal,
                    "unknown stored goal, read as custom"
                );
                Goal::Custom
            }),
            targets: Macros {
                calories: row.calories,
                protein: row.protein,
                carbs: row.carbs,
                fat: row.fat,
            },
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            is_active: row.is_active,
            created_at: Ord::max(row.created_at, 0) as u64,
        }
    }
}

#[derive(Default, FromRow)]
pub struct CompletionRow {
    pub owner_id: String,
    pub plan_id: String,
    pub date: i64,
    pub day: String,
    pub category: String,
    pub meal_id: String,
    pub completed_at: Option<i64>,
}

impl TryFrom<CompletionRow> for CompletionRecord {
    type Error = nutriplan_shared::Error;

    fn try_from(row: CompletionRow) -> Result<Self> {
        Ok(CompletionRecord {
            key: CompletionKey {
                owner_id: row.owner_id,
                plan_id: row.plan_id,
                date: date_from_unix(row.date)?,
                day: row.day.parse()?,
                category: row.category.parse()?,
                meal_id: row.meal_id,
            },
            completed_at: row.completed_at.map(|v| Ord::max(v, 0) as u64),
        })
    }
}

/// SQLite backed store. Reads go to `read_db`, writes to `write_db`.
#[derive(Clone)]
pub struct SqliteStore {
    pub read_db: SqlitePool,
    pub write_db: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }

    pub fn with_pools(read_db: SqlitePool, write_db: SqlitePool) -> Self {
        Self { read_db, write_db }
    }

    fn select_plan() -> SelectStatement {
        Query::select()
            .columns([
                DietPlanTable::Id,
                DietPlanTable::OwnerId,
                DietPlanTable::Name,
                DietPlanTable::Goal,
                DietPlanTable::Calories,
                DietPlanTable::Protein,
                DietPlanTable::Carbs,
                DietPlanTable::Fat,
                DietPlanTable::IsActive,
                DietPlanTable::WeeklyPlan,
                DietPlanTable::CreatedAt,
            ])
            .from(DietPlanTable::Table)
            .to_owned()
    }

    fn select_completion() -> SelectStatement {
        Query::select()
            .columns([
                MealCompletion::OwnerId,
                MealCompletion::PlanId,
                MealCompletion::Date,
                MealCompletion::Day,
                MealCompletion::Category,
                MealCompletion::MealId,
                MealCompletion::CompletedAt,
            ])
            .from(MealCompletion::Table)
            .to_owned()
    }

    async fn fetch_plan(&self, statement: SelectStatement) -> Result<Option<DietPlan>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, PlanRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.map(Into::into))
    }
}

fn record_columns() -> [MealCompletion; 8] {
    [
        MealCompletion::OwnerId,
        MealCompletion::PlanId,
        MealCompletion::Date,
        MealCompletion::Day,
        MealCompletion::Category,
        MealCompletion::MealId,
        MealCompletion::CompletedAt,
        MealCompletion::UpdatedAt,
    ]
}

fn key_columns() -> [MealCompletion; 6] {
    [
        MealCompletion::OwnerId,
        MealCompletion::PlanId,
        MealCompletion::Date,
        MealCompletion::Day,
        MealCompletion::Category,
        MealCompletion::MealId,
    ]
}

#[async_trait::async_trait]
impl PlanStore for SqliteStore {
    async fn get_plan(&self, id: &str) -> Result<Option<DietPlan>> {
        let statement = Self::select_plan()
            .and_where(Expr::col(DietPlanTable::Id).eq(id))
            .limit(1)
            .to_owned();

        self.fetch_plan(statement).await
    }

    async fn active_plan(&self, owner_id: &str) -> Result<Option<DietPlan>> {
        let statement = Self::select_plan()
            .and_where(Expr::col(DietPlanTable::OwnerId).eq(owner_id))
            .and_where(Expr::col(DietPlanTable::IsActive).eq(true))
            .order_by(DietPlanTable::CreatedAt, sea_query::Order::Desc)
            .limit(1)
            .to_owned();

        self.fetch_plan(statement).await
    }

    async fn insert_plan(&self, plan: &DietPlan) -> Result<()> {
        let weekly_plan = serde_json::to_string(&plan.weekly_plan)?;

        let statement = Query::insert()
            .into_table(DietPlanTable::Table)
            .columns([
                DietPlanTable::Id,
                DietPlanTable::OwnerId,
                DietPlanTable::Name,
                DietPlanTable::Goal,
                DietPlanTable::Calories,
                DietPlanTable::Protein,
                DietPlanTable::Carbs,
                DietPlanTable::Fat,
                DietPlanTable::IsActive,
                DietPlanTable::WeeklyPlan,
                DietPlanTable::CreatedAt,
            ])
            .values_panic([
                plan.id.to_owned().into(),
                plan.owner_id.to_owned().into(),
                plan.name.to_owned().into(),
                plan.goal.to_string().into(),
                plan.targets.calories.into(),
                plan.targets.protein.into(),
                plan.targets.carbs.into(),
                plan.targets.fat.into(),
                plan.is_active.into(),
                weekly_plan.into(),
                (plan.created_at as i64).into(),
            ])
            .on_conflict(OnConflict::column(DietPlanTable::Id).do_nothing().to_owned())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            nutriplan_shared::user!("plan {} already exists", plan.id);
        }

        Ok(())
    }

    async fn update_plan(&self, plan: &DietPlan) -> Result<bool> {
        let weekly_plan = serde_json::to_string(&plan.weekly_plan)?;

        let statement = Query::update()
            .table(DietPlanTable::Table)
            .values([
                (DietPlanTable::Name, plan.name.to_owned().into()),
                (DietPlanTable::Goal, plan.goal.to_string().into()),
                (DietPlanTable::Calories, plan.targets.calories.into()),
                (DietPlanTable::Protein, plan.targets.protein.into()),
                (DietPlanTable::Carbs, plan.targets.carbs.into()),
                (DietPlanTable::Fat, plan.targets.fat.into()),
                (DietPlanTable::WeeklyPlan, weekly_plan.into()),
                (DietPlanTable::UpdatedAt, (unix_now() as i64).into()),
            ])
            .and_where(Expr::col(DietPlanTable::Id).eq(&plan.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, owner_id: &str, plan_id: &str) -> Result<bool> {
        let mut tx = self.write_db.begin().await?;

        let activate = Query::update()
            .table(DietPlanTable::Table)
            .values([(DietPlanTable::IsActive, true.into())])
            .and_where(Expr::col(DietPlanTable::Id).eq(plan_id))
            .and_where(Expr::col(DietPlanTable::OwnerId).eq(owner_id))
            .to_owned();

        let (sql, values) = activate.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let deactivate = Query::update()
            .table(DietPlanTable::Table)
            .values([(DietPlanTable::IsActive, false.into())])
            .and_where(Expr::col(DietPlanTable::OwnerId).eq(owner_id))
            .and_where(Expr::col(DietPlanTable::Id).ne(plan_id))
            .to_owned();

        let (sql, values) = deactivate.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn get_completion(&self, key: &CompletionKey) -> Result<Option<CompletionRecord>> {
        let statement = Self::select_completion()
            .and_where(Expr::col(MealCompletion::OwnerId).eq(&key.owner_id))
            .and_where(Expr::col(MealCompletion::PlanId).eq(&key.plan_id))
            .and_where(Expr::col(MealCompletion::Date).eq(date_to_unix(key.date)))
            .and_where(Expr::col(MealCompletion::Day).eq(key.day.to_string()))
            .and_where(Expr::col(MealCompletion::Category).eq(key.category.to_string()))
            .and_where(Expr::col(MealCompletion::MealId).eq(&key.meal_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, CompletionRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn upsert_completion(&self, record: &CompletionRecord) -> Result<()> {
        let key = &record.key;
        let statement = Query::insert()
            .into_table(MealCompletion::Table)
            .columns(record_columns())
            .values_panic([
                key.owner_id.to_owned().into(),
                key.plan_id.to_owned().into(),
                date_to_unix(key.date).into(),
                key.day.to_string().into(),
                key.category.to_string().into(),
                key.meal_id.to_owned().into(),
                record.completed_at.map(|v| v as i64).into(),
                (unix_now() as i64).into(),
            ])
            .on_conflict(
                OnConflict::columns(key_columns())
                    .update_columns([MealCompletion::CompletedAt, MealCompletion::UpdatedAt])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        Ok(())
    }

    async fn query_completions(
        &self,
        owner_id: &str,
        plan_id: &str,
        day: DayKey,
        date: Date,
    ) -> Result<Vec<CompletionRecord>> {
        let statement = Self::select_completion()
            .and_where(Expr::col(MealCompletion::OwnerId).eq(owner_id))
            .and_where(Expr::col(MealCompletion::PlanId).eq(plan_id))
            .and_where(Expr::col(MealCompletion::Date).eq(date_to_unix(date)))
            .and_where(Expr::col(MealCompletion::Day).eq(day.to_string()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, CompletionRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    /// Single upsert so two toggles racing on a fresh key can never both
    /// create a record: the composite primary key turns the second insert
    /// into a flip.
    async fn toggle_completion(&self, key: &CompletionKey, at: u64) -> Result<CompletionRecord> {
        let statement = Query::insert()
            .into_table(MealCompletion::Table)
            .columns(record_columns())
            .values_panic([
                key.owner_id.to_owned().into(),
                key.plan_id.to_owned().into(),
                date_to_unix(key.date).into(),
                key.day.to_string().into(),
                key.category.to_string().into(),
                key.meal_id.to_owned().into(),
                (at as i64).into(),
                (unix_now() as i64).into(),
            ])
            .on_conflict(
                OnConflict::columns(key_columns())
                    .values([
                        (
                            MealCompletion::CompletedAt,
                            Expr::cust(
                                r#"CASE WHEN "meal_completion"."completed_at" IS NULL THEN "excluded"."completed_at" ELSE NULL END"#,
                            ),
                        ),
                        (
                            MealCompletion::UpdatedAt,
                            Expr::cust(r#""excluded"."updated_at""#),
                        ),
                    ])
                    .to_owned(),
            )
            .returning_col(MealCompletion::CompletedAt)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (completed_at,) = sqlx::query_as_with::<_, (Option<i64>,), _>(&sql, values)
            .fetch_one(&self.write_db)
            .await?;

        Ok(CompletionRecord {
            key: key.clone(),
            completed_at: completed_at.map(|v| Ord::max(v, 0) as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_row_degrades_bad_stored_data() {
        let plan: DietPlan = PlanRow {
            id: "p1".to_owned(),
            owner_id: "john".to_owned(),
            name: "week".to_owned(),
            goal: "bulking".to_owned(),
            weekly_plan: "not json".to_owned(),
            created_at: -5,
            ..Default::default()
        }
        .into();

        assert_eq!(plan.goal, Goal::Custom);
        assert!(plan.weekly_plan.is_empty());
        assert_eq!(plan.created_at, 0);

        let plan: DietPlan = PlanRow {
            goal: "muscle_gain".to_owned(),
            weekly_plan: r#"{"monday": {}}"#.to_owned(),
            ..Default::default()
        }
        .into();
        assert_eq!(plan.goal, Goal::MuscleGain);
        assert!(plan.day_plan_for(DayKey::Monday).is_some());
    }

    #[test]
    fn test_completion_row_clamps_negative_timestamp() -> Result<()> {
        let record: CompletionRecord = CompletionRow {
            owner_id: "john".to_owned(),
            plan_id: "p1".to_owned(),
            date: 1_704_067_200,
            day: "monday".to_owned(),
            category: "lunch".to_owned(),
            meal_id: "b".to_owned(),
            completed_at: Some(-1),
        }
        .try_into()?;

        assert_eq!(record.completed_at, Some(0));
        assert_eq!(record.key.date, time::macros::date!(2024 - 01 - 01));

        Ok(())
    }
}
