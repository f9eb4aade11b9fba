// src/db/sales_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::SalesStore,
    models::{
        financial::SalesFilter,
        sale::{Sale, SaleStatus},
    },
};

const SALE_COLUMNS: &str = r#"
    id, company, status, kind,
    house_id, house_name,
    client_name, client_gender, client_location, origin,
    check_in, check_out,
    net_value, concierge_value, additional_sales, supplier_sales,
    housekeeper_cost, sales_commission,
    notes, created_at
"#;

// O repositório de vendas, responsável pela tabela 'sales'
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for SalesRepository {
    async fn list_sales(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError> {
        // Só entram no WHERE os critérios presentes no filtro
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM sales WHERE 1 = 1", SALE_COLUMNS));

        if let Some(start) = filter.start_date {
            query.push(" AND check_in >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND check_in <= ").push_bind(end);
        }
        if let Some(company) = filter.company {
            query.push(" AND company = ").push_bind(company);
        }
        if let Some(house_id) = filter.house_id {
            query.push(" AND house_id = ").push_bind(house_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }

        query.push(" ORDER BY check_in ASC NULLS LAST, created_at ASC");

        let sales = query
            .build_query_as::<Sale>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    async fn insert_sale(&self, sale: &Sale) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, company, status, kind,
                house_id, house_name,
                client_name, client_gender, client_location, origin,
                check_in, check_out,
                net_value, concierge_value, additional_sales, supplier_sales,
                housekeeper_cost, sales_commission,
                notes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(sale.id)
        .bind(sale.company)
        .bind(sale.status)
        .bind(sale.kind)
        .bind(sale.house_id)
        .bind(&sale.house_name)
        .bind(&sale.client_name)
        .bind(&sale.client_gender)
        .bind(&sale.client_location)
        .bind(&sale.origin)
        .bind(sale.check_in)
        .bind(sale.check_out)
        .bind(sale.net_value)
        .bind(sale.concierge_value)
        .bind(sale.additional_sales)
        .bind(sale.supplier_sales)
        .bind(sale.housekeeper_cost)
        .bind(sale.sales_commission)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_sale_status(
        &self,
        id: Uuid,
        status: SaleStatus,
        notes: Option<&str>,
    ) -> Result<Option<Sale>, AppError> {
        // Observação só é trocada quando vier no pedido
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales
            SET status = $2, notes = COALESCE($3, notes)
            WHERE id = $1
            RETURNING {}
            "#,
            SALE_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }
}
