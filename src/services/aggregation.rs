// src/services/aggregation.rs

// Funções puras de filtro, agrupamento e agregação sobre vendas já carregadas.
// Nenhuma delas acessa o banco: os serviços buscam, estas funções calculam.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        financial::{
            BucketAggregate, CashFlowEntry, Comparison, Dimension, Period, SalesFilter, Trend,
        },
        goals::GoalStatus,
        sale::{Sale, SaleStatus},
    },
};

/// Balde de quem não tem o campo de agrupamento preenchido.
pub const NOT_INFORMED: &str = "Não informado";

pub type Buckets<'a> = BTreeMap<String, Vec<&'a Sale>>;

// =========================================================================
//  FILTRO
// =========================================================================

pub fn validate_filter(filter: &SalesFilter) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(AppError::InvalidFilter(format!(
                "data inicial {} é posterior à data final {}",
                start, end
            )));
        }
    }
    Ok(())
}

pub fn matches_filter(sale: &Sale, filter: &SalesFilter) -> bool {
    // Com qualquer limite de data, venda sem check-in fica de fora
    if filter.start_date.is_some() || filter.end_date.is_some() {
        let Some(check_in) = sale.check_in else {
            return false;
        };
        if filter.start_date.is_some_and(|start| check_in < start) {
            return false;
        }
        if filter.end_date.is_some_and(|end| check_in > end) {
            return false;
        }
    }

    filter.company.is_none_or(|c| sale.company == c)
        && filter.house_id.is_none_or(|h| sale.house_id == Some(h))
        && filter.status.is_none_or(|s| sale.status == s)
}

pub fn filter_sales(sales: &[Sale], filter: &SalesFilter) -> Vec<Sale> {
    sales
        .iter()
        .filter(|s| matches_filter(s, filter))
        .cloned()
        .collect()
}

/// Vendas que contam como receita: sem status no filtro, canceladas saem.
pub fn revenue_sales(sales: Vec<Sale>, filter: &SalesFilter) -> Vec<Sale> {
    if filter.status.is_some() {
        return sales;
    }
    sales
        .into_iter()
        .filter(|s| s.status != SaleStatus::Cancelled)
        .collect()
}

// =========================================================================
//  AGRUPAMENTO
// =========================================================================

/// Chaves ordenáveis como texto: `YYYY-MM-DD`, `YYYY-MM`, `YYYY-Qn`, `YYYY`.
pub fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format("%Y-%m-%d").to_string(),
        Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Period::Quarter => format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
        Period::Year => format!("{:04}", date.year()),
    }
}

pub fn dimension_key(sale: &Sale, dimension: Dimension) -> Option<String> {
    match dimension {
        Dimension::House => sale
            .house_name
            .clone()
            .or_else(|| sale.house_id.map(|id| id.to_string())),
        Dimension::Gender => sale.client_gender.clone(),
        Dimension::Location => sale.client_location.clone(),
        Dimension::Origin => sale.origin.clone(),
        Dimension::Company => Some(sale.company.label().to_string()),
    }
}

/// Particiona as vendas: cada uma cai em exatamente um balde.
pub fn group_by<'a, F>(sales: &'a [Sale], key_fn: F) -> Buckets<'a>
where
    F: Fn(&Sale) -> Option<String>,
{
    let mut groups: Buckets<'a> = BTreeMap::new();
    for sale in sales {
        let key = key_fn(sale)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| NOT_INFORMED.to_string());
        groups.entry(key).or_default().push(sale);
    }
    groups
}

pub fn group_by_period(sales: &[Sale], period: Period) -> Buckets<'_> {
    group_by(sales, |s| s.check_in.map(|d| period_key(d, period)))
}

pub fn group_by_dimension(sales: &[Sale], dimension: Dimension) -> Buckets<'_> {
    group_by(sales, |s| dimension_key(s, dimension))
}

// =========================================================================
//  AGREGAÇÃO
// =========================================================================

pub fn sum_by<F>(sales: &[&Sale], field: F) -> Decimal
where
    F: Fn(&Sale) -> Decimal,
{
    sales.iter().map(|s| field(*s)).sum()
}

pub fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

pub fn percentage_of(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value / total * Decimal::ONE_HUNDRED
}

pub fn aggregate_bucket(key: &str, sales: &[&Sale], total: Decimal) -> BucketAggregate {
    let gross_revenue = sum_by(sales, Sale::gross_revenue);
    let total_costs = sum_by(sales, Sale::total_costs);

    BucketAggregate {
        key: key.to_string(),
        count: sales.len(),
        gross_revenue,
        total_costs,
        profit: gross_revenue - total_costs,
        average_ticket: average(gross_revenue, sales.len()),
        percentage: percentage_of(gross_revenue, total),
    }
}

/// Um agregado por balde, na ordem das chaves (cronológica para períodos).
pub fn aggregate_buckets(groups: &Buckets<'_>, total: Decimal) -> Vec<BucketAggregate> {
    groups
        .iter()
        .map(|(key, sales)| aggregate_bucket(key, sales, total))
        .collect()
}

/// Receita total de todos os baldes (denominador dos percentuais).
pub fn buckets_total(groups: &Buckets<'_>) -> Decimal {
    groups
        .values()
        .map(|sales| sum_by(sales, Sale::gross_revenue))
        .sum()
}

pub fn sort_by_revenue_desc(entries: &mut [BucketAggregate]) {
    entries.sort_by(|a, b| {
        b.gross_revenue
            .cmp(&a.gross_revenue)
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Saldo acumulado: entrada i soma os saldos de 0 até i.
pub fn cash_flow(groups: &Buckets<'_>) -> Vec<CashFlowEntry> {
    let mut accumulated = Decimal::ZERO;

    groups
        .iter()
        .map(|(period, sales)| {
            let inflow = sum_by(sales, Sale::gross_revenue);
            let outflow = sum_by(sales, Sale::total_costs);
            let balance = inflow - outflow;
            accumulated += balance;

            CashFlowEntry {
                period: period.clone(),
                inflow,
                outflow,
                balance,
                accumulated_balance: accumulated,
            }
        })
        .collect()
}

// =========================================================================
//  COMPARAÇÃO E CLASSIFICAÇÃO
// =========================================================================

/// Variação do período anterior (`previous`) para o atual (`current`).
/// Base zero: atual positivo vale 100%, atual zero vale 0%, atual negativo -100%.
pub fn compare(previous: Decimal, current: Decimal) -> Comparison {
    let absolute_change = current - previous;

    let percentage_change = if previous.is_zero() {
        if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else if current < Decimal::ZERO {
            -Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    } else {
        absolute_change / previous * Decimal::ONE_HUNDRED
    };

    let trend = if absolute_change > Decimal::ZERO {
        Trend::Up
    } else if absolute_change < Decimal::ZERO {
        Trend::Down
    } else {
        Trend::Neutral
    };

    Comparison {
        previous,
        current,
        absolute_change,
        percentage_change,
        trend,
    }
}

pub fn classify(achieved: Decimal, goal: Decimal) -> GoalStatus {
    // Meta zerada conta como "no caminho", mesmo sem nada realizado.
    // TODO: confirmar com o financeiro se isso deveria virar um status "sem meta".
    if goal.is_zero() {
        return GoalStatus::OnTrack;
    }

    let ratio = achieved / goal;
    if ratio >= Decimal::ONE {
        GoalStatus::Exceeded
    } else if ratio >= Decimal::new(7, 1) {
        GoalStatus::OnTrack
    } else {
        GoalStatus::BelowTarget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::Company;
    use crate::services::test_support::{date, sale};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    #[test]
    fn period_keys_are_zero_padded() {
        let d = date("2024-03-05");
        assert_eq!(period_key(d, Period::Day), "2024-03-05");
        assert_eq!(period_key(d, Period::Month), "2024-03");
        assert_eq!(period_key(d, Period::Quarter), "2024-Q1");
        assert_eq!(period_key(d, Period::Year), "2024");
        assert_eq!(period_key(date("2024-12-31"), Period::Quarter), "2024-Q4");
        assert_eq!(period_key(date("2024-07-01"), Period::Quarter), "2024-Q3");
    }

    #[test]
    fn month_keys_sort_chronologically() {
        let sales = vec![
            sale("2024-11-02", dec!(10)),
            sale("2024-02-10", dec!(10)),
            sale("2023-12-25", dec!(10)),
        ];
        let keys: Vec<_> = group_by_period(&sales, Period::Month).into_keys().collect();
        assert_eq!(keys, vec!["2023-12", "2024-02", "2024-11"]);
    }

    #[test]
    fn missing_grouping_field_goes_to_catch_all_bucket() {
        let mut no_date = sale("2024-01-01", dec!(50));
        no_date.check_in = None;
        let mut with_gender = sale("2024-01-01", dec!(10));
        with_gender.client_gender = Some("feminino".into());
        let mut blank_gender = sale("2024-01-01", dec!(10));
        blank_gender.client_gender = Some("   ".into());

        let by_month = group_by_period(std::slice::from_ref(&no_date), Period::Month);
        assert_eq!(by_month[NOT_INFORMED].len(), 1);

        let sales = vec![with_gender, blank_gender];
        let by_gender = group_by_dimension(&sales, Dimension::Gender);
        assert_eq!(by_gender["feminino"].len(), 1);
        assert_eq!(by_gender[NOT_INFORMED].len(), 1);
    }

    #[test]
    fn filter_applies_every_present_criterion() {
        let mut giogio = sale("2024-01-15", dec!(100));
        giogio.company = Company::Giogio;
        let mut cancelled = sale("2024-01-20", dec!(100));
        cancelled.status = SaleStatus::Cancelled;
        let mut undated = sale("2024-01-20", dec!(100));
        undated.check_in = None;
        let out_of_range = sale("2024-03-01", dec!(100));
        let sales = vec![giogio, cancelled, undated, out_of_range];

        let filter = SalesFilter {
            start_date: Some(date("2024-01-01")),
            end_date: Some(date("2024-01-31")),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &filter).len(), 2);

        let filter = SalesFilter {
            company: Some(Company::Giogio),
            ..Default::default()
        };
        assert_eq!(filter_sales(&sales, &filter).len(), 1);

        // Sem limite de data a venda sem check-in continua
        assert_eq!(filter_sales(&sales, &SalesFilter::default()).len(), 4);
    }

    #[test]
    fn cancelled_sales_only_count_when_status_is_requested() {
        let mut cancelled = sale("2024-01-20", dec!(100));
        cancelled.status = SaleStatus::Cancelled;
        let sales = vec![sale("2024-01-10", dec!(100)), cancelled];

        assert_eq!(revenue_sales(sales.clone(), &SalesFilter::default()).len(), 1);

        let filter = SalesFilter {
            status: Some(SaleStatus::Cancelled),
            ..Default::default()
        };
        assert_eq!(revenue_sales(sales, &filter).len(), 2);
    }

    #[test]
    fn inverted_date_range_is_an_invalid_filter() {
        let filter = SalesFilter {
            start_date: Some(date("2024-02-01")),
            end_date: Some(date("2024-01-01")),
            ..Default::default()
        };
        assert!(matches!(
            validate_filter(&filter),
            Err(AppError::InvalidFilter(_))
        ));
        assert!(validate_filter(&SalesFilter::default()).is_ok());
    }

    #[test]
    fn average_and_percentage_guard_against_zero() {
        assert_eq!(average(dec!(100), 0), Decimal::ZERO);
        assert_eq!(average(dec!(100), 4), dec!(25));
        assert_eq!(percentage_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage_of(dec!(25), dec!(200)), dec!(12.5));
    }

    #[test]
    fn bucket_aggregate_sums_revenue_and_costs() {
        let mut a = sale("2024-01-01", dec!(1000));
        a.concierge_value = dec!(200);
        a.housekeeper_cost = dec!(100);
        let mut b = sale("2024-01-02", dec!(600));
        b.sales_commission = dec!(50);
        let sales = vec![a, b];
        let refs: Vec<&Sale> = sales.iter().collect();

        let agg = aggregate_bucket("2024-01", &refs, dec!(3600));
        assert_eq!(agg.count, 2);
        assert_eq!(agg.gross_revenue, dec!(1800));
        assert_eq!(agg.total_costs, dec!(150));
        assert_eq!(agg.profit, dec!(1650));
        assert_eq!(agg.average_ticket, dec!(900));
        assert_eq!(agg.percentage, dec!(50));
    }

    #[test]
    fn revenue_sort_is_descending() {
        let mut entries = vec![
            BucketAggregate {
                key: "a".into(),
                count: 1,
                gross_revenue: dec!(10),
                total_costs: Decimal::ZERO,
                profit: dec!(10),
                average_ticket: dec!(10),
                percentage: dec!(10),
            },
            BucketAggregate {
                key: "b".into(),
                count: 1,
                gross_revenue: dec!(90),
                total_costs: Decimal::ZERO,
                profit: dec!(90),
                average_ticket: dec!(90),
                percentage: dec!(90),
            },
        ];
        sort_by_revenue_desc(&mut entries);
        assert_eq!(entries[0].key, "b");
    }

    #[test]
    fn compare_matches_documented_examples() {
        let c = compare(dec!(100), dec!(150));
        assert_eq!(c.absolute_change, dec!(50));
        assert_eq!(c.percentage_change, dec!(50));
        assert_eq!(c.trend, Trend::Up);

        let c = compare(Decimal::ZERO, dec!(50));
        assert_eq!(c.absolute_change, dec!(50));
        assert_eq!(c.percentage_change, dec!(100));
        assert_eq!(c.trend, Trend::Up);

        let c = compare(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(c.absolute_change, Decimal::ZERO);
        assert_eq!(c.percentage_change, Decimal::ZERO);
        assert_eq!(c.trend, Trend::Neutral);

        let c = compare(dec!(200), dec!(150));
        assert_eq!(c.percentage_change, dec!(-25));
        assert_eq!(c.trend, Trend::Down);

        let c = compare(Decimal::ZERO, dec!(-50));
        assert_eq!(c.absolute_change, dec!(-50));
        assert_eq!(c.percentage_change, dec!(-100));
        assert_eq!(c.trend, Trend::Down);

        // Base negativa: a tendência segue o sinal da variação, não o do percentual
        let c = compare(dec!(-100), dec!(50));
        assert_eq!(c.absolute_change, dec!(150));
        assert_eq!(c.percentage_change, dec!(-150));
        assert_eq!(c.trend, Trend::Up);
    }

    #[test]
    fn classify_matches_documented_thresholds() {
        assert_eq!(classify(dec!(80), dec!(100)), GoalStatus::OnTrack);
        assert_eq!(classify(dec!(100), dec!(100)), GoalStatus::Exceeded);
        assert_eq!(classify(dec!(50), dec!(100)), GoalStatus::BelowTarget);
        assert_eq!(classify(dec!(70), dec!(100)), GoalStatus::OnTrack);
        assert_eq!(classify(dec!(69.99), dec!(100)), GoalStatus::BelowTarget);
        assert_eq!(classify(Decimal::ZERO, Decimal::ZERO), GoalStatus::OnTrack);
    }

    // --- Propriedades ---

    fn sales_strategy() -> impl Strategy<Value = Vec<Sale>> {
        prop::collection::vec(
            (
                prop::option::of((2020i32..2026, 1u32..13, 1u32..29)),
                0i64..5_000_000,
                0i64..500_000,
                prop::option::of(prop_oneof!["feminino", "masculino", "outro"]),
            ),
            0..60,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(ymd, net_cents, cost_cents, gender)| {
                    let mut s = sale("2024-01-01", Decimal::new(net_cents, 2));
                    s.check_in = ymd.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
                    s.housekeeper_cost = Decimal::new(cost_cents, 2);
                    s.client_gender = gender.map(|g| g.to_string());
                    s
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn grouping_partitions_the_input(sales in sales_strategy()) {
            let groups = group_by_period(&sales, Period::Month);

            let total: usize = groups.values().map(|b| b.len()).sum();
            prop_assert_eq!(total, sales.len());

            let ids: HashSet<_> = groups.values().flatten().map(|s| s.id).collect();
            prop_assert_eq!(ids.len(), sales.len());

            let revenue: Decimal = sales.iter().map(Sale::gross_revenue).sum();
            prop_assert_eq!(buckets_total(&groups), revenue);
        }

        #[test]
        fn breakdown_percentages_sum_to_one_hundred(sales in sales_strategy()) {
            let groups = group_by_dimension(&sales, Dimension::Gender);
            let total = buckets_total(&groups);
            prop_assume!(!total.is_zero());

            let sum: Decimal = aggregate_buckets(&groups, total)
                .iter()
                .map(|e| e.percentage)
                .sum();
            prop_assert!((sum - Decimal::ONE_HUNDRED).abs() <= dec!(0.01));
        }

        #[test]
        fn accumulated_balance_is_running_sum(sales in sales_strategy()) {
            let entries = cash_flow(&group_by_period(&sales, Period::Month));

            let mut running = Decimal::ZERO;
            for entry in &entries {
                running += entry.balance;
                prop_assert_eq!(entry.accumulated_balance, running);
                prop_assert_eq!(entry.balance, entry.inflow - entry.outflow);
            }
        }
    }
}
