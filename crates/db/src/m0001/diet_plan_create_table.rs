use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::DietPlan;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(DietPlan::Table)
        .col(
            ColumnDef::new(DietPlan::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(DietPlan::OwnerId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(DietPlan::Name).string().not_null())
        .col(
            ColumnDef::new(DietPlan::Goal)
                .string()
                .string_len(25)
                .not_null(),
        )
        .col(ColumnDef::new(DietPlan::Calories).double().not_null())
        .col(ColumnDef::new(DietPlan::Protein).double().not_null())
        .col(ColumnDef::new(DietPlan::Carbs).double().not_null())
        .col(ColumnDef::new(DietPlan::Fat).double().not_null())
        .col(
            ColumnDef::new(DietPlan::IsActive)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(ColumnDef::new(DietPlan::WeeklyPlan).text().not_null())
        .col(ColumnDef::new(DietPlan::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(DietPlan::UpdatedAt).big_integer().null())
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(DietPlan::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
