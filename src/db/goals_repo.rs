// src/db/goals_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::store::GoalStore,
    models::goals::{AnnualGoal, GoalTargets, MonthlyGoal},
};

#[derive(Clone)]
pub struct GoalsRepository {
    pool: PgPool,
}

impl GoalsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalStore for GoalsRepository {
    // =========================================================================
    //  METAS ANUAIS
    // =========================================================================

    async fn find_annual_goal(&self, year: i32) -> Result<Option<AnnualGoal>, AppError> {
        let goal = sqlx::query_as::<_, AnnualGoal>("SELECT * FROM annual_goals WHERE year = $1")
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;

        Ok(goal)
    }

    async fn upsert_annual_goal(
        &self,
        year: i32,
        targets: &GoalTargets,
    ) -> Result<AnnualGoal, AppError> {
        // UPSERT (Insert or Update)
        let goal = sqlx::query_as::<_, AnnualGoal>(
            r#"
            INSERT INTO annual_goals (
                year, rental_sales, contracts, supplier_commission, concierge, house_sales
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (year)
            DO UPDATE SET
                rental_sales = EXCLUDED.rental_sales,
                contracts = EXCLUDED.contracts,
                supplier_commission = EXCLUDED.supplier_commission,
                concierge = EXCLUDED.concierge,
                house_sales = EXCLUDED.house_sales,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(year)
        .bind(targets.rental_sales)
        .bind(targets.contracts)
        .bind(targets.supplier_commission)
        .bind(targets.concierge)
        .bind(targets.house_sales)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    // =========================================================================
    //  METAS MENSAIS
    // =========================================================================

    async fn find_monthly_goal(
        &self,
        year: i32,
        month: i32,
    ) -> Result<Option<MonthlyGoal>, AppError> {
        let goal = sqlx::query_as::<_, MonthlyGoal>(
            "SELECT * FROM monthly_goals WHERE year = $1 AND month = $2",
        )
        .bind(year)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(goal)
    }

    async fn list_monthly_goals(&self, year: i32) -> Result<Vec<MonthlyGoal>, AppError> {
        let goals = sqlx::query_as::<_, MonthlyGoal>(
            "SELECT * FROM monthly_goals WHERE year = $1 ORDER BY month ASC",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    async fn upsert_monthly_goal(
        &self,
        year: i32,
        month: i32,
        targets: &GoalTargets,
    ) -> Result<MonthlyGoal, AppError> {
        let goal = sqlx::query_as::<_, MonthlyGoal>(
            r#"
            INSERT INTO monthly_goals (
                year, month, rental_sales, contracts, supplier_commission, concierge, house_sales
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (year, month)
            DO UPDATE SET
                rental_sales = EXCLUDED.rental_sales,
                contracts = EXCLUDED.contracts,
                supplier_commission = EXCLUDED.supplier_commission,
                concierge = EXCLUDED.concierge,
                house_sales = EXCLUDED.house_sales,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(year)
        .bind(month)
        .bind(targets.rental_sales)
        .bind(targets.contracts)
        .bind(targets.supplier_commission)
        .bind(targets.concierge)
        .bind(targets.house_sales)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }
}
