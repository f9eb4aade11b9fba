// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{GoalsRepository, MemoryStore, NotificationRepository, ProcessRepository, SalesRepository},
    services::{
        financial_service::FinancialService, goals_service::GoalsService,
        notification_service::NotificationService, process_service::ProcessService,
        sales_service::SalesService,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Sem DATABASE_URL a aplicação sobe com o store em memória
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Alíquota estimada do relatório de impostos, em %
    pub tax_rate: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .context("DB_MAX_CONNECTIONS deve ser um número inteiro")?,
            Err(_) => 5,
        };

        let tax_rate = match env::var("TAX_RATE_PERCENT") {
            Ok(value) => Decimal::from_str(value.trim())
                .context("TAX_RATE_PERCENT deve ser um número decimal")?,
            Err(_) => Decimal::new(6, 0),
        };

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            tax_rate,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub sales_service: SalesService,
    pub financial_service: FinancialService,
    pub goals_service: GoalsService,
    pub process_service: ProcessService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(database_url) = &config.database_url else {
            tracing::warn!("⚠️ DATABASE_URL não definida: usando armazenamento em memória");
            return Ok(Self::in_memory(Arc::new(MemoryStore::new()), config));
        };

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let sales = Arc::new(SalesRepository::new(db_pool.clone()));
        let goals = Arc::new(GoalsRepository::new(db_pool.clone()));
        let processes = Arc::new(ProcessRepository::new(db_pool.clone()));
        let notifications = Arc::new(NotificationRepository::new(db_pool.clone()));

        Ok(Self {
            db_pool: Some(db_pool),
            sales_service: SalesService::new(sales.clone()),
            financial_service: FinancialService::new(sales.clone(), config.tax_rate),
            goals_service: GoalsService::new(goals, sales),
            process_service: ProcessService::new(processes, notifications.clone()),
            notification_service: NotificationService::new(notifications),
        })
    }

    pub fn in_memory(store: Arc<MemoryStore>, config: &AppConfig) -> Self {
        Self {
            db_pool: None,
            sales_service: SalesService::new(store.clone()),
            financial_service: FinancialService::new(store.clone(), config.tax_rate),
            goals_service: GoalsService::new(store.clone(), store.clone()),
            process_service: ProcessService::new(store.clone(), store.clone()),
            notification_service: NotificationService::new(store),
        }
    }
}
