// src/db/store.rs

// Capacidades de acesso a dados. Os serviços recebem `Arc<dyn ...Store>`,
// então o Postgres pode ser trocado pelo `MemoryStore` nos testes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        financial::SalesFilter,
        goals::{AnnualGoal, GoalTargets, MonthlyGoal},
        notification::Notification,
        process::{ConciergeProcess, ProcessStep, StepState},
        sale::{Sale, SaleStatus},
    },
};

#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Busca por igualdade (empresa, imóvel, status) e intervalo de check-in.
    async fn list_sales(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError>;

    async fn insert_sale(&self, sale: &Sale) -> Result<(), AppError>;

    async fn update_sale_status(
        &self,
        id: Uuid,
        status: SaleStatus,
        notes: Option<&str>,
    ) -> Result<Option<Sale>, AppError>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn find_annual_goal(&self, year: i32) -> Result<Option<AnnualGoal>, AppError>;

    /// Atualiza se já existir meta para o ano, senão insere.
    async fn upsert_annual_goal(
        &self,
        year: i32,
        targets: &GoalTargets,
    ) -> Result<AnnualGoal, AppError>;

    async fn find_monthly_goal(&self, year: i32, month: i32)
        -> Result<Option<MonthlyGoal>, AppError>;

    async fn list_monthly_goals(&self, year: i32) -> Result<Vec<MonthlyGoal>, AppError>;

    async fn upsert_monthly_goal(
        &self,
        year: i32,
        month: i32,
        targets: &GoalTargets,
    ) -> Result<MonthlyGoal, AppError>;
}

#[async_trait]
pub trait ProcessStore: Send + Sync {
    /// `sale_id` inexistente vira `AppError::SaleNotFound`.
    async fn insert_process(&self, process: &ConciergeProcess) -> Result<(), AppError>;

    async fn find_process(&self, id: Uuid) -> Result<Option<ConciergeProcess>, AppError>;

    async fn list_processes(&self) -> Result<Vec<ConciergeProcess>, AppError>;

    /// Grava uma única etapa e a etapa atual numa só operação atômica.
    /// As demais etapas ficam como estão no armazenamento.
    async fn complete_step(
        &self,
        id: Uuid,
        step: ProcessStep,
        state: &StepState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ConciergeProcess>, AppError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError>;

    /// Mais recentes primeiro.
    async fn list_notifications(&self, unread_only: bool) -> Result<Vec<Notification>, AppError>;

    async fn count_unread(&self) -> Result<usize, AppError>;

    async fn mark_as_read(&self, id: Uuid) -> Result<Option<Notification>, AppError>;
}
