//src/main.rs

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Migrações só fazem sentido com banco
    if let Some(pool) = &app_state.db_pool {
        sqlx::migrate!().run(pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    }

    let app = router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    let sales_routes = Router::new()
        .route(
            "/",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/{id}/status", patch(handlers::sales::update_sale_status));

    let financial_routes = Router::new()
        .route("/dashboard", get(handlers::financial::get_dashboard))
        .route("/summary", get(handlers::financial::get_summary))
        .route(
            "/revenue-by-house",
            get(handlers::financial::get_revenue_by_house),
        )
        .route("/cash-flow", get(handlers::financial::get_cash_flow))
        .route("/contracts", get(handlers::financial::get_contracts))
        .route("/demographics", get(handlers::financial::get_demographics))
        .route("/taxes", get(handlers::financial::get_taxes))
        .route("/time-series", get(handlers::financial::get_time_series))
        .route("/comparative", get(handlers::financial::get_comparative));

    let goals_routes = Router::new()
        .route(
            "/annual/{year}",
            get(handlers::goals::get_annual_goal).put(handlers::goals::upsert_annual_goal),
        )
        .route("/monthly/{year}", get(handlers::goals::list_monthly_goals))
        .route(
            "/monthly/{year}/{month}",
            get(handlers::goals::get_monthly_goal).put(handlers::goals::upsert_monthly_goal),
        )
        .route("/thermometer/{year}", get(handlers::goals::get_thermometer))
        .route("/dashboard/{year}", get(handlers::goals::get_goals_dashboard));

    let process_routes = Router::new()
        .route(
            "/",
            get(handlers::processes::list_processes).post(handlers::processes::create_process),
        )
        .route("/dashboard", get(handlers::processes::get_process_dashboard))
        .route("/{id}", get(handlers::processes::get_process))
        .route("/{id}/advance", post(handlers::processes::advance_step));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route(
            "/unread-count",
            get(handlers::notifications::get_unread_count),
        )
        .route("/{id}/read", post(handlers::notifications::mark_as_read));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/sales", sales_routes)
        .nest("/api/financial", financial_routes)
        .nest("/api/goals", goals_routes)
        .nest("/api/processes", process_routes)
        .nest("/api/notifications", notification_routes)
        .with_state(app_state)
}
