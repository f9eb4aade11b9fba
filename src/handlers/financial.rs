// src/handlers/financial.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::financial::{
        CashFlowEntry, ComparativeQuery, ComparativeReport, ContractsReport, DemographicReport,
        DimensionQuery, FinancialDashboard, FinancialSummary, PeriodQuery, ReportEnvelope,
        RevenueByHouse, SalesFilter, TaxReport, TimeSeriesEntry,
    },
};

// GET /api/financial/dashboard
#[utoipa::path(
    get,
    path = "/api/financial/dashboard",
    tag = "Financeiro",
    params(SalesFilter),
    responses(
        (status = 200, description = "Resumo, receita por imóvel, fluxo de caixa e comparação com o período anterior", body = ReportEnvelope<FinancialDashboard>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.financial_service.dashboard(filter).await?;
    Ok((StatusCode::OK, Json(dashboard)))
}

// GET /api/financial/summary
#[utoipa::path(
    get,
    path = "/api/financial/summary",
    tag = "Financeiro",
    params(SalesFilter),
    responses(
        (status = 200, description = "Totais do período", body = ReportEnvelope<FinancialSummary>)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.financial_service.summary(filter).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/financial/revenue-by-house
#[utoipa::path(
    get,
    path = "/api/financial/revenue-by-house",
    tag = "Financeiro",
    params(SalesFilter),
    responses(
        (status = 200, description = "Receita por imóvel, da maior para a menor", body = ReportEnvelope<Vec<RevenueByHouse>>)
    )
)]
pub async fn get_revenue_by_house(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.financial_service.revenue_by_house(filter).await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/cash-flow
#[utoipa::path(
    get,
    path = "/api/financial/cash-flow",
    tag = "Financeiro",
    params(SalesFilter, PeriodQuery),
    responses(
        (status = 200, description = "Fluxo de caixa com saldo acumulado", body = ReportEnvelope<Vec<CashFlowEntry>>)
    )
)]
pub async fn get_cash_flow(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .financial_service
        .cash_flow(filter, params.period)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/contracts
#[utoipa::path(
    get,
    path = "/api/financial/contracts",
    tag = "Financeiro",
    params(SalesFilter, PeriodQuery),
    responses(
        (status = 200, description = "Contratos de locação por período e por empresa", body = ReportEnvelope<ContractsReport>)
    )
)]
pub async fn get_contracts(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .financial_service
        .contracts(filter, params.period)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/demographics
#[utoipa::path(
    get,
    path = "/api/financial/demographics",
    tag = "Financeiro",
    params(SalesFilter, DimensionQuery),
    responses(
        (status = 200, description = "Receita por gênero, localização, origem, imóvel ou empresa", body = ReportEnvelope<DemographicReport>)
    )
)]
pub async fn get_demographics(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<DimensionQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .financial_service
        .demographics(filter, params.dimension)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/taxes
#[utoipa::path(
    get,
    path = "/api/financial/taxes",
    tag = "Financeiro",
    params(SalesFilter),
    responses(
        (status = 200, description = "Imposto estimado por empresa", body = ReportEnvelope<TaxReport>)
    )
)]
pub async fn get_taxes(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.financial_service.taxes(filter).await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/time-series
#[utoipa::path(
    get,
    path = "/api/financial/time-series",
    tag = "Financeiro",
    params(SalesFilter, PeriodQuery),
    responses(
        (status = 200, description = "Série temporal de receita", body = ReportEnvelope<Vec<TimeSeriesEntry>>)
    )
)]
pub async fn get_time_series(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
    Query(params): Query<PeriodQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .financial_service
        .time_series(filter, params.period)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}

// GET /api/financial/comparative
#[utoipa::path(
    get,
    path = "/api/financial/comparative",
    tag = "Financeiro",
    params(ComparativeQuery, SalesFilter),
    responses(
        (status = 200, description = "Comparação entre dois períodos", body = ReportEnvelope<ComparativeReport>),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn get_comparative(
    State(app_state): State<AppState>,
    Query(periods): Query<ComparativeQuery>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .financial_service
        .comparative(periods, filter)
        .await?;
    Ok((StatusCode::OK, Json(report)))
}
