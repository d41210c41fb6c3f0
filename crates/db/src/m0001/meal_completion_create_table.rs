use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::MealCompletion;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(MealCompletion::Table)
        .col(
            ColumnDef::new(MealCompletion::OwnerId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealCompletion::PlanId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(MealCompletion::Date).big_integer().not_null())
        .col(
            ColumnDef::new(MealCompletion::Day)
                .string()
                .string_len(10)
                .not_null(),
        )
        .col(
            ColumnDef::new(MealCompletion::Category)
                .string()
                .string_len(10)
                .not_null(),
        )
        .col(ColumnDef::new(MealCompletion::MealId).string().not_null())
        .col(
            ColumnDef::new(MealCompletion::CompletedAt)
                .big_integer()
                .null(),
        )
        .col(
            ColumnDef::new(MealCompletion::UpdatedAt)
                .big_integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(MealCompletion::OwnerId)
                .col(MealCompletion::PlanId)
                .col(MealCompletion::Date)
                .col(MealCompletion::Day)
                .col(MealCompletion::Category)
                .col(MealCompletion::MealId),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(MealCompletion::Table).to_owned()
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
