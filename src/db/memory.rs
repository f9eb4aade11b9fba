// src/db/memory.rs

// Store em memória com a mesma semântica dos repositórios Postgres.
// Usado nos testes e quando a aplicação sobe sem DATABASE_URL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{GoalStore, NotificationStore, ProcessStore, SalesStore},
    models::{
        financial::SalesFilter,
        goals::{AnnualGoal, GoalTargets, MonthlyGoal},
        notification::Notification,
        process::{ConciergeProcess, ProcessStep, StepState},
        sale::{Sale, SaleStatus},
    },
    services::aggregation::matches_filter,
};

#[derive(Default)]
pub struct MemoryStore {
    sales: RwLock<Vec<Sale>>,
    annual_goals: RwLock<Vec<AnnualGoal>>,
    monthly_goals: RwLock<Vec<MonthlyGoal>>,
    processes: RwLock<Vec<ConciergeProcess>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sales(sales: Vec<Sale>) -> Self {
        Self {
            sales: RwLock::new(sales),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn list_sales(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError> {
        let sales = self.sales.read().await;
        let mut found: Vec<Sale> = sales
            .iter()
            .filter(|s| matches_filter(s, filter))
            .cloned()
            .collect();
        // Mesma ordem do repositório: check-in ascendente, sem data no fim
        found.sort_by_key(|s| (s.check_in.is_none(), s.check_in, s.created_at));
        Ok(found)
    }

    async fn insert_sale(&self, sale: &Sale) -> Result<(), AppError> {
        self.sales.write().await.push(sale.clone());
        Ok(())
    }

    async fn update_sale_status(
        &self,
        id: Uuid,
        status: SaleStatus,
        notes: Option<&str>,
    ) -> Result<Option<Sale>, AppError> {
        let mut sales = self.sales.write().await;
        let Some(sale) = sales.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        sale.status = status;
        if let Some(notes) = notes {
            sale.notes = Some(notes.to_string());
        }
        Ok(Some(sale.clone()))
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn find_annual_goal(&self, year: i32) -> Result<Option<AnnualGoal>, AppError> {
        let goals = self.annual_goals.read().await;
        Ok(goals.iter().find(|g| g.year == year).cloned())
    }

    async fn upsert_annual_goal(
        &self,
        year: i32,
        targets: &GoalTargets,
    ) -> Result<AnnualGoal, AppError> {
        let mut goals = self.annual_goals.write().await;
        let now = Utc::now();

        if let Some(goal) = goals.iter_mut().find(|g| g.year == year) {
            goal.targets = targets.clone();
            goal.updated_at = now;
            return Ok(goal.clone());
        }

        let goal = AnnualGoal {
            id: Uuid::new_v4(),
            year,
            targets: targets.clone(),
            created_at: now,
            updated_at: now,
        };
        goals.push(goal.clone());
        Ok(goal)
    }

    async fn find_monthly_goal(
        &self,
        year: i32,
        month: i32,
    ) -> Result<Option<MonthlyGoal>, AppError> {
        let goals = self.monthly_goals.read().await;
        Ok(goals
            .iter()
            .find(|g| g.year == year && g.month == month)
            .cloned())
    }

    async fn list_monthly_goals(&self, year: i32) -> Result<Vec<MonthlyGoal>, AppError> {
        let goals = self.monthly_goals.read().await;
        let mut found: Vec<MonthlyGoal> = goals.iter().filter(|g| g.year == year).cloned().collect();
        found.sort_by_key(|g| g.month);
        Ok(found)
    }

    async fn upsert_monthly_goal(
        &self,
        year: i32,
        month: i32,
        targets: &GoalTargets,
    ) -> Result<MonthlyGoal, AppError> {
        let mut goals = self.monthly_goals.write().await;
        let now = Utc::now();

        if let Some(goal) = goals.iter_mut().find(|g| g.year == year && g.month == month) {
            goal.targets = targets.clone();
            goal.updated_at = now;
            return Ok(goal.clone());
        }

        let goal = MonthlyGoal {
            id: Uuid::new_v4(),
            year,
            month,
            targets: targets.clone(),
            created_at: now,
            updated_at: now,
        };
        goals.push(goal.clone());
        Ok(goal)
    }
}

#[async_trait]
impl ProcessStore for MemoryStore {
    async fn insert_process(&self, process: &ConciergeProcess) -> Result<(), AppError> {
        // Mesmo efeito da chave estrangeira concierge_processes.sale_id
        if let Some(sale_id) = process.sale_id {
            let sales = self.sales.read().await;
            if !sales.iter().any(|s| s.id == sale_id) {
                return Err(AppError::SaleNotFound(sale_id));
            }
        }
        self.processes.write().await.push(process.clone());
        Ok(())
    }

    async fn find_process(&self, id: Uuid) -> Result<Option<ConciergeProcess>, AppError> {
        let processes = self.processes.read().await;
        Ok(processes.iter().find(|p| p.id == id).cloned())
    }

    async fn list_processes(&self) -> Result<Vec<ConciergeProcess>, AppError> {
        let processes = self.processes.read().await;
        let mut found = processes.clone();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn complete_step(
        &self,
        id: Uuid,
        step: ProcessStep,
        state: &StepState,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ConciergeProcess>, AppError> {
        let mut processes = self.processes.write().await;
        let Some(process) = processes.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *process.steps.get_mut(step) = state.clone();
        process.current_step = step;
        process.updated_at = updated_at;
        Ok(Some(process.clone()))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_notifications(&self, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        let notifications = self.notifications.read().await;
        let mut found: Vec<Notification> = notifications
            .iter()
            .filter(|n| !unread_only || !n.read)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn count_unread(&self) -> Result<usize, AppError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().filter(|n| !n.read).count())
    }

    async fn mark_as_read(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let mut notifications = self.notifications.write().await;
        let Some(notification) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        notification.read = true;
        Ok(Some(notification.clone()))
    }
}
