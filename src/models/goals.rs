// src/models/goals.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::sale::validate_money;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    RentalSales,        // Vendas de locação (R$)
    Contracts,          // Quantidade de contratos
    SupplierCommission, // Comissão de fornecedores (R$)
    Concierge,          // Concierge (R$)
    HouseSales,         // Venda de casas (R$)
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 5] = [
        GoalCategory::RentalSales,
        GoalCategory::Contracts,
        GoalCategory::SupplierCommission,
        GoalCategory::Concierge,
        GoalCategory::HouseSales,
    ];
}

// Três faixas: < 70% abaixo, 70–99% no caminho, >= 100% superada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    BelowTarget,
    OnTrack,
    Exceeded,
}

/// Valores-alvo (ou realizados) por categoria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalTargets {
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    #[schema(example = "250000.00")]
    pub rental_sales: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    #[schema(example = "40")]
    pub contracts: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub supplier_commission: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub concierge: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub house_sales: Decimal,
}

impl GoalTargets {
    pub fn get(&self, category: GoalCategory) -> Decimal {
        match category {
            GoalCategory::RentalSales => self.rental_sales,
            GoalCategory::Contracts => self.contracts,
            GoalCategory::SupplierCommission => self.supplier_commission,
            GoalCategory::Concierge => self.concierge,
            GoalCategory::HouseSales => self.house_sales,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualGoal {
    pub id: Uuid,
    #[schema(example = 2024)]
    pub year: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub targets: GoalTargets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoal {
    pub id: Uuid,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub targets: GoalTargets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Período da meta (validado antes de ir ao banco) ---

#[derive(Debug, Validate)]
pub struct YearPath {
    #[validate(range(min = 2000, max = 2100, message = "Ano fora do intervalo permitido"))]
    pub year: i32,
}

#[derive(Debug, Validate)]
pub struct MonthPath {
    #[validate(range(min = 2000, max = 2100, message = "Ano fora do intervalo permitido"))]
    pub year: i32,
    #[validate(range(min = 1, max = 12, message = "Mês deve estar entre 1 e 12"))]
    pub month: i32,
}

// --- Visões derivadas ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalComparison {
    pub category: GoalCategory,
    pub goal: Decimal,
    pub achieved: Decimal,
    pub percentage: Decimal,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualThermometer {
    pub year: i32,
    pub categories: Vec<GoalComparison>,
    pub overall_percentage: Decimal,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoalProgress {
    pub month: i32,
    pub categories: Vec<GoalComparison>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalsDashboard {
    pub year: i32,
    // Ausente quando o ano ainda não tem meta anual cadastrada
    pub thermometer: Option<AnnualThermometer>,
    pub months: Vec<MonthlyGoalProgress>,
}
