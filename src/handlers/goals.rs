// src/handlers/goals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::goals::{AnnualGoal, AnnualThermometer, GoalTargets, GoalsDashboard, MonthlyGoal},
};

// =========================================================================
//  METAS ANUAIS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/goals/annual/{year}",
    tag = "Metas",
    params(("year" = i32, Path, description = "Ano da meta")),
    responses(
        (status = 200, description = "Meta anual", body = AnnualGoal),
        (status = 400, description = "Ano fora do intervalo"),
        (status = 404, description = "Nenhuma meta cadastrada")
    )
)]
pub async fn get_annual_goal(
    State(app_state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state.goals_service.get_annual_goal(year).await?;
    Ok((StatusCode::OK, Json(goal)))
}

#[utoipa::path(
    put,
    path = "/api/goals/annual/{year}",
    tag = "Metas",
    request_body = GoalTargets,
    params(("year" = i32, Path, description = "Ano da meta")),
    responses(
        (status = 200, description = "Meta anual criada ou atualizada", body = AnnualGoal),
        (status = 400, description = "Valores inválidos")
    )
)]
pub async fn upsert_annual_goal(
    State(app_state): State<AppState>,
    Path(year): Path<i32>,
    Json(payload): Json<GoalTargets>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state
        .goals_service
        .upsert_annual_goal(year, payload)
        .await?;
    Ok((StatusCode::OK, Json(goal)))
}

// =========================================================================
//  METAS MENSAIS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/goals/monthly/{year}",
    tag = "Metas",
    params(("year" = i32, Path, description = "Ano")),
    responses(
        (status = 200, description = "Metas mensais do ano, por mês", body = Vec<MonthlyGoal>)
    )
)]
pub async fn list_monthly_goals(
    State(app_state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let goals = app_state.goals_service.list_monthly_goals(year).await?;
    Ok((StatusCode::OK, Json(goals)))
}

#[utoipa::path(
    get,
    path = "/api/goals/monthly/{year}/{month}",
    tag = "Metas",
    params(
        ("year" = i32, Path, description = "Ano"),
        ("month" = i32, Path, description = "Mês (1 a 12)")
    ),
    responses(
        (status = 200, description = "Meta do mês", body = MonthlyGoal),
        (status = 404, description = "Nenhuma meta cadastrada")
    )
)]
pub async fn get_monthly_goal(
    State(app_state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state.goals_service.get_monthly_goal(year, month).await?;
    Ok((StatusCode::OK, Json(goal)))
}

#[utoipa::path(
    put,
    path = "/api/goals/monthly/{year}/{month}",
    tag = "Metas",
    request_body = GoalTargets,
    params(
        ("year" = i32, Path, description = "Ano"),
        ("month" = i32, Path, description = "Mês (1 a 12)")
    ),
    responses(
        (status = 200, description = "Meta mensal criada ou atualizada", body = MonthlyGoal),
        (status = 400, description = "Mês ou valores inválidos")
    )
)]
pub async fn upsert_monthly_goal(
    State(app_state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    Json(payload): Json<GoalTargets>,
) -> Result<impl IntoResponse, AppError> {
    let goal = app_state
        .goals_service
        .upsert_monthly_goal(year, month, payload)
        .await?;
    Ok((StatusCode::OK, Json(goal)))
}

// =========================================================================
//  ACOMPANHAMENTO
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/goals/thermometer/{year}",
    tag = "Metas",
    params(("year" = i32, Path, description = "Ano")),
    responses(
        (status = 200, description = "Termômetro anual", body = AnnualThermometer),
        (status = 404, description = "Nenhuma meta anual cadastrada")
    )
)]
pub async fn get_thermometer(
    State(app_state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let thermometer = app_state.goals_service.thermometer(year).await?;
    Ok((StatusCode::OK, Json(thermometer)))
}

#[utoipa::path(
    get,
    path = "/api/goals/dashboard/{year}",
    tag = "Metas",
    params(("year" = i32, Path, description = "Ano")),
    responses(
        (status = 200, description = "Termômetro anual e progresso mensal", body = GoalsDashboard)
    )
)]
pub async fn get_goals_dashboard(
    State(app_state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.goals_service.dashboard(year).await?;
    Ok((StatusCode::OK, Json(dashboard)))
}
