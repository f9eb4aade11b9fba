// src/models/financial.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::sale::{Company, SaleStatus};

// =========================================================================
//  FILTROS E PARÂMETROS
// =========================================================================

/// Filtro comum a todos os relatórios. Datas se aplicam ao check-in (inclusivas).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesFilter {
    #[param(value_type = Option<String>, format = Date, example = "2024-01-01")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date, example = "2024-12-31")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub company: Option<Company>,
    pub house_id: Option<Uuid>,
    pub status: Option<SaleStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    #[default]
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    House,
    #[default]
    Gender,
    Location,
    Origin,
    Company,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DimensionQuery {
    #[serde(default)]
    pub dimension: Dimension,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ComparativeQuery {
    #[param(value_type = String, format = Date)]
    pub period1_start: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub period1_end: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub period2_start: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub period2_end: NaiveDate,
}

// =========================================================================
//  ENVELOPE
// =========================================================================

// Todo relatório volta junto com o filtro que o gerou. O cliente descarta
// respostas cujo filtro não bate mais com o estado atual da tela.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope<T> {
    pub filter: SalesFilter,
    pub generated_at: DateTime<Utc>,
    pub data: T,
}

impl<T> ReportEnvelope<T> {
    pub fn new(filter: SalesFilter, data: T) -> Self {
        Self {
            filter,
            generated_at: Utc::now(),
            data,
        }
    }
}

// =========================================================================
//  AGREGADOS
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Comparação "período atual vs anterior" usada por todos os indicadores.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub previous: Decimal,
    pub current: Decimal,
    pub absolute_change: Decimal,
    pub percentage_change: Decimal,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketAggregate {
    #[schema(example = "2024-01")]
    pub key: String,
    pub count: usize,
    pub gross_revenue: Decimal,
    pub total_costs: Decimal,
    pub profit: Decimal,
    pub average_ticket: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: SaleStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub sales_count: usize,
    pub gross_revenue: Decimal,
    pub net_value: Decimal,
    pub concierge_value: Decimal,
    pub additional_sales: Decimal,
    pub supplier_sales: Decimal,
    pub housekeeper_cost: Decimal,
    pub sales_commission: Decimal,
    pub total_costs: Decimal,
    pub profit: Decimal,
    pub average_ticket: Decimal,
    pub profit_margin: Decimal,
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueByHouse {
    pub house_id: Option<Uuid>,
    pub house_name: String,
    pub sales_count: usize,
    pub gross_revenue: Decimal,
    pub profit: Decimal,
    pub average_ticket: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEntry {
    #[schema(example = "2024-01")]
    pub period: String,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub balance: Decimal,
    pub accumulated_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractsByPeriod {
    pub period: String,
    pub contracts: usize,
    pub total_value: Decimal,
    pub average_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractsReport {
    pub total_contracts: usize,
    pub total_value: Decimal,
    pub average_value: Decimal,
    pub by_period: Vec<ContractsByPeriod>,
    pub by_company: Vec<BucketAggregate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemographicReport {
    pub dimension: Dimension,
    pub total_revenue: Decimal,
    pub entries: Vec<BucketAggregate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxEntry {
    pub company: String,
    pub sales_count: usize,
    pub gross_revenue: Decimal,
    pub percentage: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    #[schema(example = "6.00")]
    pub rate: Decimal,
    pub total_revenue: Decimal,
    pub total_tax: Decimal,
    pub entries: Vec<TaxEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesEntry {
    pub period: String,
    pub sales_count: usize,
    pub gross_revenue: Decimal,
    pub profit: Decimal,
    pub average_ticket: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeReport {
    #[schema(value_type = String, format = Date)]
    pub period1_start: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub period1_end: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub period2_start: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub period2_end: NaiveDate,
    pub gross_revenue: Comparison,
    pub profit: Comparison,
    pub sales_count: Comparison,
    pub average_ticket: Comparison,
    pub concierge_revenue: Comparison,
}

// Painel financeiro: tudo que a tela inicial precisa em uma resposta só
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDashboard {
    pub summary: FinancialSummary,
    pub revenue_by_house: Vec<RevenueByHouse>,
    pub cash_flow: Vec<CashFlowEntry>,
    // Só existe quando o filtro tem início e fim
    pub vs_previous_period: Option<ComparativeReport>,
}
