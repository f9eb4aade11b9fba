// src/services/process_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{NotificationStore, ProcessStore},
    models::{
        notification::{Notification, NotificationPriority, NotificationType},
        process::{
            AdvanceStepRequest, AdvanceStepResult, ConciergeProcess, CreateProcessRequest,
            ProcessDashboard, ProcessStep, StepCount, StepState,
        },
    },
    services::aggregation::percentage_of,
};

#[derive(Clone)]
pub struct ProcessService {
    processes: Arc<dyn ProcessStore>,
    notifications: Arc<dyn NotificationStore>,
}

impl ProcessService {
    pub fn new(processes: Arc<dyn ProcessStore>, notifications: Arc<dyn NotificationStore>) -> Self {
        Self {
            processes,
            notifications,
        }
    }

    pub async fn create_process(
        &self,
        input: CreateProcessRequest,
    ) -> Result<ConciergeProcess, AppError> {
        // Valida o nome já sem espaços: "   " não passa como nome
        let input = CreateProcessRequest {
            client_name: input.client_name.trim().to_string(),
            ..input
        };
        input.validate()?;

        let process = ConciergeProcess::new(input.sale_id, input.client_name);
        self.processes.insert_process(&process).await?;

        tracing::info!("Processo de concierge {} aberto", process.id);
        Ok(process)
    }

    pub async fn get_process(&self, id: Uuid) -> Result<ConciergeProcess, AppError> {
        self.processes
            .find_process(id)
            .await?
            .ok_or(AppError::ProcessNotFound(id))
    }

    pub async fn list_processes(&self) -> Result<Vec<ConciergeProcess>, AppError> {
        self.processes.list_processes().await
    }

    // --- TRANSIÇÃO ---

    /// Conclui a etapa pedida e gera exatamente uma notificação.
    /// Não exige que a etapa seja a seguinte da atual: saltos são só registrados no log.
    pub async fn advance_step(
        &self,
        process_id: Uuid,
        input: AdvanceStepRequest,
    ) -> Result<AdvanceStepResult, AppError> {
        input.validate()?;

        let current = self.get_process(process_id).await?;
        let target = input.target_step;

        if current.current_step.next() != Some(target) {
            tracing::warn!(
                "Processo {}: salto de {:?} para {:?} (não é a etapa seguinte)",
                current.id,
                current.current_step,
                target
            );
        }

        let now = Utc::now();
        let state = StepState {
            completed: true,
            completed_at: Some(now),
            notes: input.notes.or_else(|| current.steps.get(target).notes.clone()),
        };

        // Só a etapa alvo é gravada; outra transição concorrente não é desfeita
        let process = self
            .processes
            .complete_step(process_id, target, &state, now)
            .await?
            .ok_or(AppError::ProcessNotFound(process_id))?;

        let notification = step_notification(&process, target);
        self.notifications.insert_notification(&notification).await?;

        Ok(AdvanceStepResult {
            process,
            notification,
        })
    }

    // --- PAINEL ---

    pub async fn dashboard(&self) -> Result<ProcessDashboard, AppError> {
        let processes = self.processes.list_processes().await?;
        Ok(dashboard(&processes))
    }
}

fn step_notification(process: &ConciergeProcess, step: ProcessStep) -> Notification {
    // Comprovantes enviados fecham o processo
    let priority = match step {
        ProcessStep::ReceiptsSent => NotificationPriority::High,
        _ => NotificationPriority::Medium,
    };

    Notification {
        id: Uuid::new_v4(),
        kind: NotificationType::ProcessStep,
        priority,
        title: format!("Etapa concluída: {}", step.label()),
        message: format!(
            "Processo de {}: etapa \"{}\" concluída.",
            process.client_name,
            step.label()
        ),
        read: false,
        scheduled_for: None,
        process_id: Some(process.id),
        created_at: Utc::now(),
    }
}

pub fn dashboard(processes: &[ConciergeProcess]) -> ProcessDashboard {
    let total = processes.len();
    let completed = processes.iter().filter(|p| p.is_finished()).count();

    let by_step = ProcessStep::ALL
        .iter()
        .map(|step| StepCount {
            step: *step,
            label: step.label().to_string(),
            count: processes.iter().filter(|p| p.current_step == *step).count(),
        })
        .collect();

    ProcessDashboard {
        total,
        completed,
        in_progress: total - completed,
        completion_rate: percentage_of(completed.into(), total.into()),
        by_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SalesStore};
    use crate::services::test_support;
    use rust_decimal_macros::dec;

    fn service(store: Arc<MemoryStore>) -> ProcessService {
        ProcessService::new(store.clone(), store)
    }

    async fn open(svc: &ProcessService) -> ConciergeProcess {
        svc.create_process(CreateProcessRequest {
            sale_id: None,
            client_name: "Maria Souza".into(),
        })
        .await
        .unwrap()
    }

    // Atrasa a leitura para que duas transições leiam o mesmo estado antes de gravar
    struct SlowReads(Arc<MemoryStore>);

    #[async_trait::async_trait]
    impl ProcessStore for SlowReads {
        async fn insert_process(&self, process: &ConciergeProcess) -> Result<(), AppError> {
            self.0.insert_process(process).await
        }

        async fn find_process(&self, id: Uuid) -> Result<Option<ConciergeProcess>, AppError> {
            let found = self.0.find_process(id).await;
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            found
        }

        async fn list_processes(&self) -> Result<Vec<ConciergeProcess>, AppError> {
            self.0.list_processes().await
        }

        async fn complete_step(
            &self,
            id: Uuid,
            step: ProcessStep,
            state: &StepState,
            updated_at: chrono::DateTime<Utc>,
        ) -> Result<Option<ConciergeProcess>, AppError> {
            self.0.complete_step(id, step, state, updated_at).await
        }
    }

    #[test]
    fn steps_follow_fixed_order() {
        assert_eq!(ProcessStep::MenuSent.next(), Some(ProcessStep::MenuReceived));
        assert_eq!(ProcessStep::CheckoutDone.next(), Some(ProcessStep::ReceiptsSent));
        assert_eq!(ProcessStep::ReceiptsSent.next(), None);
        assert_eq!(ProcessStep::ALL.len(), 8);
    }

    #[tokio::test]
    async fn new_process_starts_at_menu_sent() {
        let svc = service(Arc::new(MemoryStore::new()));
        let process = open(&svc).await;

        assert_eq!(process.current_step, ProcessStep::MenuSent);
        assert!(ProcessStep::ALL.iter().all(|s| !process.steps.get(*s).completed));
    }

    #[tokio::test]
    async fn advancing_marks_only_target_step_and_notifies_once() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let process = open(&svc).await;

        let result = svc
            .advance_step(
                process.id,
                AdvanceStepRequest {
                    target_step: ProcessStep::MenuReceived,
                    notes: Some("Cliente pediu sem glúten".into()),
                },
            )
            .await
            .unwrap();

        let steps = &result.process.steps;
        assert!(steps.menu_received.completed);
        assert!(steps.menu_received.completed_at.is_some());
        assert_eq!(
            steps.menu_received.notes.as_deref(),
            Some("Cliente pediu sem glúten")
        );
        assert_eq!(result.process.current_step, ProcessStep::MenuReceived);
        for step in ProcessStep::ALL {
            if step != ProcessStep::MenuReceived {
                assert!(!steps.get(step).completed, "{:?} não deveria mudar", step);
            }
        }

        let notifications = store.list_notifications(false).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].process_id, Some(process.id));
        assert_eq!(notifications[0].kind, NotificationType::ProcessStep);

        let saved = svc.get_process(process.id).await.unwrap();
        assert_eq!(saved.current_step, ProcessStep::MenuReceived);
    }

    #[tokio::test]
    async fn concurrent_advances_keep_both_steps() {
        let store = Arc::new(MemoryStore::new());
        let svc = ProcessService::new(Arc::new(SlowReads(store.clone())), store.clone());
        let process = open(&svc).await;

        let (a, b) = tokio::join!(
            svc.advance_step(
                process.id,
                AdvanceStepRequest {
                    target_step: ProcessStep::MenuReceived,
                    notes: None,
                },
            ),
            svc.advance_step(
                process.id,
                AdvanceStepRequest {
                    target_step: ProcessStep::BudgetSent,
                    notes: None,
                },
            )
        );
        a.unwrap();
        b.unwrap();

        let saved = svc.get_process(process.id).await.unwrap();
        assert!(saved.steps.menu_received.completed);
        assert!(saved.steps.budget_sent.completed);
        assert_eq!(store.list_notifications(false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn notes_are_kept_when_step_is_repeated_without_notes() {
        let svc = service(Arc::new(MemoryStore::new()));
        let process = open(&svc).await;

        for notes in [Some("Pix recebido".to_string()), None] {
            svc.advance_step(
                process.id,
                AdvanceStepRequest {
                    target_step: ProcessStep::PaymentConfirmed,
                    notes,
                },
            )
            .await
            .unwrap();
        }

        let saved = svc.get_process(process.id).await.unwrap();
        assert_eq!(saved.steps.payment_confirmed.notes.as_deref(), Some("Pix recebido"));
    }

    #[tokio::test]
    async fn process_for_unknown_sale_is_sale_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let missing = Uuid::new_v4();

        let err = svc
            .create_process(CreateProcessRequest {
                sale_id: Some(missing),
                client_name: "Maria Souza".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SaleNotFound(id) if id == missing));
        assert!(svc.list_processes().await.unwrap().is_empty());

        let existing = test_support::sale("2025-03-10", dec!(1000));
        store.insert_sale(&existing).await.unwrap();
        let process = svc
            .create_process(CreateProcessRequest {
                sale_id: Some(existing.id),
                client_name: "Maria Souza".into(),
            })
            .await
            .unwrap();
        assert_eq!(process.sale_id, Some(existing.id));
    }

    #[tokio::test]
    async fn blank_client_name_is_rejected() {
        let svc = service(Arc::new(MemoryStore::new()));

        let err = svc
            .create_process(CreateProcessRequest {
                sale_id: None,
                client_name: "   ".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let process = svc
            .create_process(CreateProcessRequest {
                sale_id: None,
                client_name: "  Maria Souza ".into(),
            })
            .await
            .unwrap();
        assert_eq!(process.client_name, "Maria Souza");
    }

    #[tokio::test]
    async fn jumps_are_accepted() {
        let svc = service(Arc::new(MemoryStore::new()));
        let process = open(&svc).await;

        let result = svc
            .advance_step(
                process.id,
                AdvanceStepRequest {
                    target_step: ProcessStep::ReceiptsSent,
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.process.current_step, ProcessStep::ReceiptsSent);
        assert!(!result.process.steps.menu_received.completed);
        assert_eq!(result.notification.priority, NotificationPriority::High);
    }

    #[tokio::test]
    async fn unknown_process_is_not_found() {
        let svc = service(Arc::new(MemoryStore::new()));
        let err = svc
            .advance_step(
                Uuid::new_v4(),
                AdvanceStepRequest {
                    target_step: ProcessStep::MenuReceived,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProcessNotFound(_)));
    }

    #[tokio::test]
    async fn dashboard_counts_by_current_step() {
        let svc = service(Arc::new(MemoryStore::new()));
        let a = open(&svc).await;
        open(&svc).await;
        svc.advance_step(
            a.id,
            AdvanceStepRequest {
                target_step: ProcessStep::ReceiptsSent,
                notes: None,
            },
        )
        .await
        .unwrap();

        let dash = svc.dashboard().await.unwrap();
        assert_eq!(dash.total, 2);
        assert_eq!(dash.completed, 1);
        assert_eq!(dash.in_progress, 1);
        assert_eq!(dash.completion_rate, dec!(50));

        let count_at = |step: ProcessStep| {
            dash.by_step
                .iter()
                .find(|c| c.step == step)
                .map(|c| c.count)
                .unwrap_or_default()
        };
        assert_eq!(count_at(ProcessStep::MenuSent), 1);
        assert_eq!(count_at(ProcessStep::ReceiptsSent), 1);
    }
}
