// src/models/process.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::notification::Notification;

// As 8 etapas do processo de concierge, em ordem fixa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "process_step", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessStep {
    MenuSent,
    MenuReceived,
    BudgetSent,
    PaymentConfirmed,
    ShoppingDone,
    DeliveryDone,
    CheckoutDone,
    ReceiptsSent,
}

impl ProcessStep {
    pub const ALL: [ProcessStep; 8] = [
        ProcessStep::MenuSent,
        ProcessStep::MenuReceived,
        ProcessStep::BudgetSent,
        ProcessStep::PaymentConfirmed,
        ProcessStep::ShoppingDone,
        ProcessStep::DeliveryDone,
        ProcessStep::CheckoutDone,
        ProcessStep::ReceiptsSent,
    ];

    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or_default()
    }

    pub fn next(&self) -> Option<ProcessStep> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// Chave da etapa dentro do JSONB `steps` (mesma do serde de `ProcessSteps`).
    pub fn json_key(&self) -> &'static str {
        match self {
            ProcessStep::MenuSent => "menuSent",
            ProcessStep::MenuReceived => "menuReceived",
            ProcessStep::BudgetSent => "budgetSent",
            ProcessStep::PaymentConfirmed => "paymentConfirmed",
            ProcessStep::ShoppingDone => "shoppingDone",
            ProcessStep::DeliveryDone => "deliveryDone",
            ProcessStep::CheckoutDone => "checkoutDone",
            ProcessStep::ReceiptsSent => "receiptsSent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessStep::MenuSent => "Cardápio enviado",
            ProcessStep::MenuReceived => "Cardápio recebido",
            ProcessStep::BudgetSent => "Orçamento enviado",
            ProcessStep::PaymentConfirmed => "Pagamento confirmado",
            ProcessStep::ShoppingDone => "Compras realizadas",
            ProcessStep::DeliveryDone => "Entrega realizada",
            ProcessStep::CheckoutDone => "Check-out realizado",
            ProcessStep::ReceiptsSent => "Comprovantes enviados",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// Guardado como JSONB: { "menuSent": {...}, "menuReceived": {...}, ... }
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSteps {
    pub menu_sent: StepState,
    pub menu_received: StepState,
    pub budget_sent: StepState,
    pub payment_confirmed: StepState,
    pub shopping_done: StepState,
    pub delivery_done: StepState,
    pub checkout_done: StepState,
    pub receipts_sent: StepState,
}

impl ProcessSteps {
    pub fn get(&self, step: ProcessStep) -> &StepState {
        match step {
            ProcessStep::MenuSent => &self.menu_sent,
            ProcessStep::MenuReceived => &self.menu_received,
            ProcessStep::BudgetSent => &self.budget_sent,
            ProcessStep::PaymentConfirmed => &self.payment_confirmed,
            ProcessStep::ShoppingDone => &self.shopping_done,
            ProcessStep::DeliveryDone => &self.delivery_done,
            ProcessStep::CheckoutDone => &self.checkout_done,
            ProcessStep::ReceiptsSent => &self.receipts_sent,
        }
    }

    pub fn get_mut(&mut self, step: ProcessStep) -> &mut StepState {
        match step {
            ProcessStep::MenuSent => &mut self.menu_sent,
            ProcessStep::MenuReceived => &mut self.menu_received,
            ProcessStep::BudgetSent => &mut self.budget_sent,
            ProcessStep::PaymentConfirmed => &mut self.payment_confirmed,
            ProcessStep::ShoppingDone => &mut self.shopping_done,
            ProcessStep::DeliveryDone => &mut self.delivery_done,
            ProcessStep::CheckoutDone => &mut self.checkout_done,
            ProcessStep::ReceiptsSent => &mut self.receipts_sent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConciergeProcess {
    pub id: Uuid,
    pub sale_id: Option<Uuid>,
    #[schema(example = "Maria Souza")]
    pub client_name: String,
    pub current_step: ProcessStep,
    pub steps: ProcessSteps,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConciergeProcess {
    pub fn new(sale_id: Option<Uuid>, client_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sale_id,
            client_name,
            current_step: ProcessStep::MenuSent,
            steps: ProcessSteps::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.receipts_sent.completed
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessRequest {
    pub sale_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Nome do cliente é obrigatório"))]
    #[schema(example = "Maria Souza")]
    pub client_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStepRequest {
    #[schema(example = "menu_received")]
    pub target_step: ProcessStep,

    #[validate(length(max = 1000, message = "Observação muito longa"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStepResult {
    pub process: ConciergeProcess,
    pub notification: Notification,
}

// --- Painel ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepCount {
    pub step: ProcessStep,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDashboard {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub completion_rate: rust_decimal::Decimal,
    pub by_step: Vec<StepCount>,
}
