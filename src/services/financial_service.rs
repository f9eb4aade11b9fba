// src/services/financial_service.rs

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::SalesStore,
    models::{
        financial::{
            CashFlowEntry, ComparativeQuery, ComparativeReport, ContractsByPeriod,
            ContractsReport, DemographicReport, Dimension, FinancialDashboard, FinancialSummary,
            Period, ReportEnvelope, RevenueByHouse, SalesFilter, StatusCount, TaxEntry,
            TaxReport, TimeSeriesEntry,
        },
        sale::{Sale, SaleKind, SaleStatus},
    },
    services::aggregation::{
        aggregate_buckets, average, buckets_total, cash_flow, compare, filter_sales, group_by,
        group_by_dimension, group_by_period, percentage_of, revenue_sales, sort_by_revenue_desc,
        sum_by, validate_filter,
    },
};

#[derive(Clone)]
pub struct FinancialService {
    sales: Arc<dyn SalesStore>,
    // Alíquota estimada (em %) aplicada no relatório de impostos
    tax_rate: Decimal,
}

impl FinancialService {
    pub fn new(sales: Arc<dyn SalesStore>, tax_rate: Decimal) -> Self {
        Self { sales, tax_rate }
    }

    // Busca tudo que bate com o filtro. O store já filtra, mas o filtro é
    // reaplicado em memória para não depender da implementação.
    async fn fetch(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError> {
        validate_filter(filter)?;
        let sales = self.sales.list_sales(filter).await?;
        Ok(filter_sales(&sales, filter))
    }

    async fn fetch_revenue(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError> {
        let sales = self.fetch(filter).await?;
        Ok(revenue_sales(sales, filter))
    }

    // =========================================================================
    //  RELATÓRIOS
    // =========================================================================

    pub async fn summary(
        &self,
        filter: SalesFilter,
    ) -> Result<ReportEnvelope<FinancialSummary>, AppError> {
        let all = self.fetch(&filter).await?;
        let revenue = revenue_sales(all.clone(), &filter);
        Ok(ReportEnvelope::new(filter, summarize(&all, &revenue)))
    }

    pub async fn revenue_by_house(
        &self,
        filter: SalesFilter,
    ) -> Result<ReportEnvelope<Vec<RevenueByHouse>>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        Ok(ReportEnvelope::new(filter, revenue_by_house(&sales)))
    }

    pub async fn cash_flow(
        &self,
        filter: SalesFilter,
        period: Period,
    ) -> Result<ReportEnvelope<Vec<CashFlowEntry>>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        let entries = cash_flow(&group_by_period(&sales, period));
        Ok(ReportEnvelope::new(filter, entries))
    }

    pub async fn contracts(
        &self,
        filter: SalesFilter,
        period: Period,
    ) -> Result<ReportEnvelope<ContractsReport>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        Ok(ReportEnvelope::new(filter, contracts_report(&sales, period)))
    }

    pub async fn demographics(
        &self,
        filter: SalesFilter,
        dimension: Dimension,
    ) -> Result<ReportEnvelope<DemographicReport>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        Ok(ReportEnvelope::new(filter, demographic_report(&sales, dimension)))
    }

    pub async fn taxes(&self, filter: SalesFilter) -> Result<ReportEnvelope<TaxReport>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        Ok(ReportEnvelope::new(filter, tax_report(&sales, self.tax_rate)))
    }

    pub async fn time_series(
        &self,
        filter: SalesFilter,
        period: Period,
    ) -> Result<ReportEnvelope<Vec<TimeSeriesEntry>>, AppError> {
        let sales = self.fetch_revenue(&filter).await?;
        Ok(ReportEnvelope::new(filter, time_series(&sales, period)))
    }

    /// Compara dois intervalos arbitrários. As duas leituras saem em paralelo.
    ///
    /// As datas de `base` são ignoradas: o envelope devolve o filtro base sem
    /// datas, e os dois períodos comparados ficam em `data.period1Start` ..
    /// `data.period2End`. É por eles que o cliente descarta respostas antigas.
    pub async fn comparative(
        &self,
        periods: ComparativeQuery,
        base: SalesFilter,
    ) -> Result<ReportEnvelope<ComparativeReport>, AppError> {
        let base = SalesFilter {
            start_date: None,
            end_date: None,
            ..base
        };
        let first = SalesFilter {
            start_date: Some(periods.period1_start),
            end_date: Some(periods.period1_end),
            ..base.clone()
        };
        let second = SalesFilter {
            start_date: Some(periods.period2_start),
            end_date: Some(periods.period2_end),
            ..base.clone()
        };

        let (first_sales, second_sales) =
            tokio::try_join!(self.fetch_revenue(&first), self.fetch_revenue(&second))?;

        let report = comparative_report(
            (periods.period1_start, periods.period1_end),
            &first_sales,
            (periods.period2_start, periods.period2_end),
            &second_sales,
        );
        Ok(ReportEnvelope::new(base, report))
    }

    /// Painel principal: período atual e período anterior buscados em paralelo.
    pub async fn dashboard(
        &self,
        filter: SalesFilter,
    ) -> Result<ReportEnvelope<FinancialDashboard>, AppError> {
        let previous = previous_period(&filter);

        let (all, previous_sales) = tokio::try_join!(self.fetch(&filter), async {
            match &previous {
                Some(p) => self.fetch_revenue(p).await.map(Some),
                None => Ok(None),
            }
        })?;

        let revenue = revenue_sales(all.clone(), &filter);

        let vs_previous_period = previous
            .as_ref()
            .zip(previous_sales.as_ref())
            .and_then(|(p, prev)| {
                Some(comparative_report(
                    (p.start_date?, p.end_date?),
                    prev,
                    (filter.start_date?, filter.end_date?),
                    &revenue,
                ))
            });

        let dashboard = FinancialDashboard {
            summary: summarize(&all, &revenue),
            revenue_by_house: revenue_by_house(&revenue),
            cash_flow: cash_flow(&group_by_period(&revenue, Period::Month)),
            vs_previous_period,
        };

        Ok(ReportEnvelope::new(filter, dashboard))
    }
}

// =========================================================================
//  CÁLCULOS (puros)
// =========================================================================

/// Intervalo de mesmo tamanho imediatamente antes do filtro.
pub fn previous_period(filter: &SalesFilter) -> Option<SalesFilter> {
    let (start, end) = (filter.start_date?, filter.end_date?);
    let length = (end - start).num_days() + 1;
    if length <= 0 {
        return None;
    }

    let prev_end = start.checked_sub_days(Days::new(1))?;
    let prev_start = start.checked_sub_days(Days::new(length as u64))?;

    Some(SalesFilter {
        start_date: Some(prev_start),
        end_date: Some(prev_end),
        ..filter.clone()
    })
}

/// `all` entra só na contagem por status; os valores vêm de `revenue`.
pub fn summarize(all: &[Sale], revenue: &[Sale]) -> FinancialSummary {
    let refs: Vec<&Sale> = revenue.iter().collect();

    let gross_revenue = sum_by(&refs, Sale::gross_revenue);
    let total_costs = sum_by(&refs, Sale::total_costs);
    let profit = gross_revenue - total_costs;

    let by_status = SaleStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: all.iter().filter(|s| s.status == *status).count(),
        })
        .collect();

    FinancialSummary {
        sales_count: refs.len(),
        gross_revenue,
        net_value: sum_by(&refs, |s| s.net_value),
        concierge_value: sum_by(&refs, |s| s.concierge_value),
        additional_sales: sum_by(&refs, |s| s.additional_sales),
        supplier_sales: sum_by(&refs, |s| s.supplier_sales),
        housekeeper_cost: sum_by(&refs, |s| s.housekeeper_cost),
        sales_commission: sum_by(&refs, |s| s.sales_commission),
        total_costs,
        profit,
        average_ticket: average(gross_revenue, refs.len()),
        profit_margin: percentage_of(profit, gross_revenue),
        by_status,
    }
}

pub fn revenue_by_house(sales: &[Sale]) -> Vec<RevenueByHouse> {
    // O id manda; sem id, agrupa pelo nome
    let groups = group_by(sales, |s| {
        s.house_id
            .map(|id| id.to_string())
            .or_else(|| s.house_name.clone())
    });
    let total = buckets_total(&groups);

    let mut entries: Vec<RevenueByHouse> = groups
        .iter()
        .map(|(key, bucket)| {
            let gross_revenue = sum_by(bucket, Sale::gross_revenue);
            let total_costs = sum_by(bucket, Sale::total_costs);

            RevenueByHouse {
                house_id: bucket.iter().find_map(|s| s.house_id),
                house_name: bucket
                    .iter()
                    .find_map(|s| s.house_name.clone())
                    .unwrap_or_else(|| key.clone()),
                sales_count: bucket.len(),
                gross_revenue,
                profit: gross_revenue - total_costs,
                average_ticket: average(gross_revenue, bucket.len()),
                percentage: percentage_of(gross_revenue, total),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.gross_revenue
            .cmp(&a.gross_revenue)
            .then_with(|| a.house_name.cmp(&b.house_name))
    });
    entries
}

pub fn contracts_report(sales: &[Sale], period: Period) -> ContractsReport {
    // Contrato = venda de locação
    let rentals: Vec<Sale> = sales
        .iter()
        .filter(|s| s.kind == SaleKind::Rental)
        .cloned()
        .collect();
    let refs: Vec<&Sale> = rentals.iter().collect();
    let total_value = sum_by(&refs, Sale::gross_revenue);

    let by_period = group_by_period(&rentals, period)
        .iter()
        .map(|(key, bucket)| {
            let value = sum_by(bucket, Sale::gross_revenue);
            ContractsByPeriod {
                period: key.clone(),
                contracts: bucket.len(),
                total_value: value,
                average_value: average(value, bucket.len()),
            }
        })
        .collect();

    let mut by_company = aggregate_buckets(
        &group_by_dimension(&rentals, Dimension::Company),
        total_value,
    );
    sort_by_revenue_desc(&mut by_company);

    ContractsReport {
        total_contracts: refs.len(),
        total_value,
        average_value: average(total_value, refs.len()),
        by_period,
        by_company,
    }
}

pub fn demographic_report(sales: &[Sale], dimension: Dimension) -> DemographicReport {
    let groups = group_by_dimension(sales, dimension);
    let total_revenue = buckets_total(&groups);

    let mut entries = aggregate_buckets(&groups, total_revenue);
    sort_by_revenue_desc(&mut entries);

    DemographicReport {
        dimension,
        total_revenue,
        entries,
    }
}

pub fn tax_report(sales: &[Sale], rate: Decimal) -> TaxReport {
    let groups = group_by_dimension(sales, Dimension::Company);
    let total_revenue = buckets_total(&groups);

    let mut entries: Vec<TaxEntry> = groups
        .iter()
        .map(|(company, bucket)| {
            let gross_revenue = sum_by(bucket, Sale::gross_revenue);
            TaxEntry {
                company: company.clone(),
                sales_count: bucket.len(),
                gross_revenue,
                percentage: percentage_of(gross_revenue, total_revenue),
                tax: (gross_revenue * rate / Decimal::ONE_HUNDRED).round_dp(2),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.gross_revenue
            .cmp(&a.gross_revenue)
            .then_with(|| a.company.cmp(&b.company))
    });

    TaxReport {
        rate,
        total_revenue,
        total_tax: entries.iter().map(|e| e.tax).sum(),
        entries,
    }
}

pub fn time_series(sales: &[Sale], period: Period) -> Vec<TimeSeriesEntry> {
    group_by_period(sales, period)
        .iter()
        .map(|(key, bucket)| {
            let gross_revenue = sum_by(bucket, Sale::gross_revenue);
            TimeSeriesEntry {
                period: key.clone(),
                sales_count: bucket.len(),
                gross_revenue,
                profit: gross_revenue - sum_by(bucket, Sale::total_costs),
                average_ticket: average(gross_revenue, bucket.len()),
            }
        })
        .collect()
}

pub fn comparative_report(
    (period1_start, period1_end): (NaiveDate, NaiveDate),
    first: &[Sale],
    (period2_start, period2_end): (NaiveDate, NaiveDate),
    second: &[Sale],
) -> ComparativeReport {
    let first_summary = summarize(first, first);
    let second_summary = summarize(second, second);

    ComparativeReport {
        period1_start,
        period1_end,
        period2_start,
        period2_end,
        gross_revenue: compare(first_summary.gross_revenue, second_summary.gross_revenue),
        profit: compare(first_summary.profit, second_summary.profit),
        sales_count: compare(
            Decimal::from(first_summary.sales_count),
            Decimal::from(second_summary.sales_count),
        ),
        average_ticket: compare(first_summary.average_ticket, second_summary.average_ticket),
        concierge_revenue: compare(
            first_summary.concierge_value,
            second_summary.concierge_value,
        ),
    }
}
