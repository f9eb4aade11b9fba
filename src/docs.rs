// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vendas ---
        handlers::sales::list_sales,
        handlers::sales::create_sale,
        handlers::sales::update_sale_status,

        // --- Financeiro ---
        handlers::financial::get_dashboard,
        handlers::financial::get_summary,
        handlers::financial::get_revenue_by_house,
        handlers::financial::get_cash_flow,
        handlers::financial::get_contracts,
        handlers::financial::get_demographics,
        handlers::financial::get_taxes,
        handlers::financial::get_time_series,
        handlers::financial::get_comparative,

        // --- Metas ---
        handlers::goals::get_annual_goal,
        handlers::goals::upsert_annual_goal,
        handlers::goals::list_monthly_goals,
        handlers::goals::get_monthly_goal,
        handlers::goals::upsert_monthly_goal,
        handlers::goals::get_thermometer,
        handlers::goals::get_goals_dashboard,

        // --- Concierge ---
        handlers::processes::create_process,
        handlers::processes::list_processes,
        handlers::processes::get_process,
        handlers::processes::advance_step,
        handlers::processes::get_process_dashboard,

        // --- Notificações ---
        handlers::notifications::list_notifications,
        handlers::notifications::get_unread_count,
        handlers::notifications::mark_as_read,
    ),
    components(
        schemas(
            // --- Vendas ---
            models::sale::Company,
            models::sale::SaleStatus,
            models::sale::SaleKind,
            models::sale::Sale,
            models::sale::NewSale,
            models::sale::UpdateSaleStatusRequest,

            // --- Financeiro ---
            models::financial::SalesFilter,
            models::financial::Period,
            models::financial::Dimension,
            models::financial::Trend,
            models::financial::Comparison,
            models::financial::BucketAggregate,
            models::financial::StatusCount,
            models::financial::FinancialSummary,
            models::financial::RevenueByHouse,
            models::financial::CashFlowEntry,
            models::financial::ContractsByPeriod,
            models::financial::ContractsReport,
            models::financial::DemographicReport,
            models::financial::TaxEntry,
            models::financial::TaxReport,
            models::financial::TimeSeriesEntry,
            models::financial::ComparativeReport,
            models::financial::FinancialDashboard,

            // --- Metas ---
            models::goals::GoalCategory,
            models::goals::GoalStatus,
            models::goals::GoalTargets,
            models::goals::AnnualGoal,
            models::goals::MonthlyGoal,
            models::goals::GoalComparison,
            models::goals::AnnualThermometer,
            models::goals::MonthlyGoalProgress,
            models::goals::GoalsDashboard,

            // --- Concierge ---
            models::process::ProcessStep,
            models::process::StepState,
            models::process::ProcessSteps,
            models::process::ConciergeProcess,
            models::process::CreateProcessRequest,
            models::process::AdvanceStepRequest,
            models::process::AdvanceStepResult,
            models::process::StepCount,
            models::process::ProcessDashboard,

            // --- Notificações ---
            models::notification::NotificationType,
            models::notification::NotificationPriority,
            models::notification::Notification,
            models::notification::NotificationList,
            models::notification::UnreadCount,
        )
    ),
    tags(
        (name = "Vendas", description = "Registro de vendas e locações"),
        (name = "Financeiro", description = "Relatórios financeiros sobre as vendas"),
        (name = "Metas", description = "Metas anuais e mensais e seu acompanhamento"),
        (name = "Concierge", description = "Fluxo de atendimento de concierge em 8 etapas"),
        (name = "Notificações", description = "Avisos gerados pelo fluxo de concierge")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/sales"));
        assert!(paths.contains_key("/api/financial/comparative"));
        assert!(paths.contains_key("/api/goals/monthly/{year}/{month}"));
        assert!(paths.contains_key("/api/processes/{id}/advance"));
        assert!(paths.contains_key("/api/notifications/{id}/read"));
    }
}
