// src/db/process_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ProcessStore,
    models::process::{ConciergeProcess, ProcessStep, ProcessSteps, StepState},
};

// Linha crua da tabela: as etapas vêm em uma coluna JSONB
#[derive(FromRow)]
struct ProcessRow {
    id: Uuid,
    sale_id: Option<Uuid>,
    client_name: String,
    current_step: ProcessStep,
    steps: Json<ProcessSteps>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProcessRow> for ConciergeProcess {
    fn from(row: ProcessRow) -> Self {
        Self {
            id: row.id,
            sale_id: row.sale_id,
            client_name: row.client_name,
            current_step: row.current_step,
            steps: row.steps.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct ProcessRepository {
    pool: PgPool,
}

impl ProcessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessStore for ProcessRepository {
    async fn insert_process(&self, process: &ConciergeProcess) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO concierge_processes (
                id, sale_id, client_name, current_step, steps, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(process.id)
        .bind(process.sale_id)
        .bind(&process.client_name)
        .bind(process.current_step)
        .bind(Json(&process.steps))
        .bind(process.created_at)
        .bind(process.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    if let Some(sale_id) = process.sale_id {
                        return AppError::SaleNotFound(sale_id);
                    }
                }
            }
            e.into()
        })?;

        Ok(())
    }

    async fn find_process(&self, id: Uuid) -> Result<Option<ConciergeProcess>, AppError> {
        let row = sqlx::query_as::<_, ProcessRow>(
            "SELECT * FROM concierge_processes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ConciergeProcess::from))
    }

    async fn list_processes(&self) -> Result<Vec<ConciergeProcess>, AppError> {
        let rows = sqlx::query_as::<_, ProcessRow>(
            "SELECT * FROM concierge_processes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ConciergeProcess::from).collect())
    }

    async fn complete_step(
        &self,
        id: Uuid,
        step: ProcessStep,
        state: &StepState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ConciergeProcess>, AppError> {
        // jsonb_set troca só a chave da etapa; atualizações concorrentes de
        // outras etapas não se sobrescrevem
        let row = sqlx::query_as::<_, ProcessRow>(
            r#"
            UPDATE concierge_processes
            SET steps = jsonb_set(steps, ARRAY[$2::text], $3::jsonb, true),
                current_step = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(step.json_key())
        .bind(Json(state))
        .bind(step)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ConciergeProcess::from))
    }
}
