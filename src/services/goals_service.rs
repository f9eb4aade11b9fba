// src/services/goals_service.rs

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{GoalStore, SalesStore},
    models::{
        financial::SalesFilter,
        goals::{
            AnnualGoal, AnnualThermometer, GoalCategory, GoalComparison, GoalTargets,
            GoalsDashboard, MonthPath, MonthlyGoal, MonthlyGoalProgress, YearPath,
        },
        sale::{Sale, SaleKind, SaleStatus},
    },
    services::aggregation::{classify, percentage_of},
};

#[derive(Clone)]
pub struct GoalsService {
    goals: Arc<dyn GoalStore>,
    sales: Arc<dyn SalesStore>,
}

impl GoalsService {
    pub fn new(goals: Arc<dyn GoalStore>, sales: Arc<dyn SalesStore>) -> Self {
        Self { goals, sales }
    }

    // =========================================================================
    //  CADASTRO
    // =========================================================================

    pub async fn get_annual_goal(&self, year: i32) -> Result<AnnualGoal, AppError> {
        YearPath { year }.validate()?;
        self.goals
            .find_annual_goal(year)
            .await?
            .ok_or_else(|| AppError::NoData(format!("nenhuma meta anual para {}", year)))
    }

    pub async fn upsert_annual_goal(
        &self,
        year: i32,
        targets: GoalTargets,
    ) -> Result<AnnualGoal, AppError> {
        YearPath { year }.validate()?;
        targets.validate()?;

        let goal = self.goals.upsert_annual_goal(year, &targets).await?;
        tracing::info!("Meta anual de {} salva", year);
        Ok(goal)
    }

    pub async fn get_monthly_goal(&self, year: i32, month: i32) -> Result<MonthlyGoal, AppError> {
        MonthPath { year, month }.validate()?;
        self.goals
            .find_monthly_goal(year, month)
            .await?
            .ok_or_else(|| {
                AppError::NoData(format!("nenhuma meta mensal para {:02}/{}", month, year))
            })
    }

    pub async fn list_monthly_goals(&self, year: i32) -> Result<Vec<MonthlyGoal>, AppError> {
        YearPath { year }.validate()?;
        self.goals.list_monthly_goals(year).await
    }

    pub async fn upsert_monthly_goal(
        &self,
        year: i32,
        month: i32,
        targets: GoalTargets,
    ) -> Result<MonthlyGoal, AppError> {
        MonthPath { year, month }.validate()?;
        targets.validate()?;

        let goal = self.goals.upsert_monthly_goal(year, month, &targets).await?;
        tracing::info!("Meta mensal de {:02}/{} salva", month, year);
        Ok(goal)
    }

    // =========================================================================
    //  ACOMPANHAMENTO
    // =========================================================================

    async fn sales_of_year(&self, year: i32) -> Result<Vec<Sale>, AppError> {
        let filter = SalesFilter {
            start_date: NaiveDate::from_ymd_opt(year, 1, 1),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31),
            ..Default::default()
        };
        self.sales.list_sales(&filter).await
    }

    pub async fn thermometer(&self, year: i32) -> Result<AnnualThermometer, AppError> {
        YearPath { year }.validate()?;

        let (goal, sales) =
            tokio::try_join!(self.goals.find_annual_goal(year), self.sales_of_year(year))?;
        let goal =
            goal.ok_or_else(|| AppError::NoData(format!("nenhuma meta anual para {}", year)))?;

        Ok(thermometer(year, &goal.targets, &achievements(&sales)))
    }

    /// Termômetro anual + progresso de cada mês com meta cadastrada.
    pub async fn dashboard(&self, year: i32) -> Result<GoalsDashboard, AppError> {
        YearPath { year }.validate()?;

        let (annual, monthly, sales) = tokio::try_join!(
            self.goals.find_annual_goal(year),
            self.goals.list_monthly_goals(year),
            self.sales_of_year(year)
        )?;

        let thermometer = annual.map(|goal| thermometer(year, &goal.targets, &achievements(&sales)));

        let months = monthly
            .iter()
            .map(|goal| {
                let of_month: Vec<Sale> = sales
                    .iter()
                    .filter(|s| s.check_in.is_some_and(|d| d.month() as i32 == goal.month))
                    .cloned()
                    .collect();
                MonthlyGoalProgress {
                    month: goal.month,
                    categories: compare_goal(&goal.targets, &achievements(&of_month)),
                }
            })
            .collect();

        Ok(GoalsDashboard {
            year,
            thermometer,
            months,
        })
    }
}

// =========================================================================
//  CÁLCULOS (puros)
// =========================================================================

/// Realizado por categoria. Vendas canceladas não contam.
pub fn achievements(sales: &[Sale]) -> GoalTargets {
    let mut achieved = GoalTargets::default();

    for sale in sales.iter().filter(|s| s.status != SaleStatus::Cancelled) {
        match sale.kind {
            SaleKind::Rental => {
                achieved.rental_sales += sale.net_value;
                achieved.contracts += Decimal::ONE;
            }
            SaleKind::HouseSale => achieved.house_sales += sale.net_value,
        }
        achieved.supplier_commission += sale.supplier_sales;
        achieved.concierge += sale.concierge_value;
    }

    achieved
}

pub fn compare_goal(goal: &GoalTargets, achieved: &GoalTargets) -> Vec<GoalComparison> {
    GoalCategory::ALL
        .iter()
        .map(|category| {
            let target = goal.get(*category);
            let done = achieved.get(*category);
            GoalComparison {
                category: *category,
                goal: target,
                achieved: done,
                percentage: percentage_of(done, target),
                status: classify(done, target),
            }
        })
        .collect()
}

pub fn thermometer(year: i32, goal: &GoalTargets, achieved: &GoalTargets) -> AnnualThermometer {
    let categories = compare_goal(goal, achieved);

    // Média simples das categorias com meta; categorias zeradas ficam de fora
    let with_goal: Vec<&GoalComparison> =
        categories.iter().filter(|c| !c.goal.is_zero()).collect();

    let (overall_percentage, status) = if with_goal.is_empty() {
        (Decimal::ZERO, classify(Decimal::ZERO, Decimal::ZERO))
    } else {
        let sum: Decimal = with_goal.iter().map(|c| c.percentage).sum();
        let overall = sum / Decimal::from(with_goal.len());
        (overall, classify(overall, Decimal::ONE_HUNDRED))
    };

    AnnualThermometer {
        year,
        categories,
        overall_percentage,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::goals::GoalStatus;
    use crate::services::test_support::sale;
    use rust_decimal_macros::dec;

    fn targets() -> GoalTargets {
        GoalTargets {
            rental_sales: dec!(10000),
            contracts: dec!(4),
            supplier_commission: dec!(1000),
            concierge: dec!(2000),
            house_sales: Decimal::ZERO,
        }
    }

    fn service(store: Arc<MemoryStore>) -> GoalsService {
        GoalsService::new(store.clone(), store)
    }

    #[test]
    fn achievements_split_by_kind_and_skip_cancelled() {
        let mut rental = sale("2024-01-10", dec!(5000));
        rental.concierge_value = dec!(800);
        rental.supplier_sales = dec!(300);
        let mut house = sale("2024-02-01", dec!(400000));
        house.kind = SaleKind::HouseSale;
        let mut cancelled = sale("2024-03-01", dec!(9999));
        cancelled.status = SaleStatus::Cancelled;

        let achieved = achievements(&[rental, house, cancelled]);
        assert_eq!(achieved.rental_sales, dec!(5000));
        assert_eq!(achieved.contracts, dec!(1));
        assert_eq!(achieved.house_sales, dec!(400000));
        assert_eq!(achieved.concierge, dec!(800));
        assert_eq!(achieved.supplier_commission, dec!(300));
    }

    #[test]
    fn comparison_classifies_each_category() {
        let achieved = GoalTargets {
            rental_sales: dec!(8000),
            contracts: dec!(4),
            supplier_commission: dec!(500),
            concierge: dec!(2500),
            house_sales: Decimal::ZERO,
        };

        let result = compare_goal(&targets(), &achieved);
        let status_of = |c: GoalCategory| result.iter().find(|r| r.category == c).unwrap().status;

        assert_eq!(status_of(GoalCategory::RentalSales), GoalStatus::OnTrack);
        assert_eq!(status_of(GoalCategory::Contracts), GoalStatus::Exceeded);
        assert_eq!(status_of(GoalCategory::SupplierCommission), GoalStatus::BelowTarget);
        assert_eq!(status_of(GoalCategory::Concierge), GoalStatus::Exceeded);
        // Meta zerada: sempre "no caminho"
        assert_eq!(status_of(GoalCategory::HouseSales), GoalStatus::OnTrack);
    }

    #[test]
    fn thermometer_averages_categories_with_goal() {
        let achieved = GoalTargets {
            rental_sales: dec!(10000),      // 100%
            contracts: dec!(2),             // 50%
            supplier_commission: dec!(500), // 50%
            concierge: dec!(2000),          // 100%
            house_sales: dec!(123),
        };

        let t = thermometer(2024, &targets(), &achieved);
        assert_eq!(t.overall_percentage, dec!(75));
        assert_eq!(t.status, GoalStatus::OnTrack);
        assert_eq!(t.categories.len(), 5);
    }

    #[tokio::test]
    async fn upsert_updates_existing_goal() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store);

        let first = svc.upsert_annual_goal(2024, targets()).await.unwrap();
        let mut changed = targets();
        changed.rental_sales = dec!(20000);
        let second = svc.upsert_annual_goal(2024, changed).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            svc.get_annual_goal(2024).await.unwrap().targets.rental_sales,
            dec!(20000)
        );
    }

    #[tokio::test]
    async fn monthly_goal_rejects_invalid_month() {
        let svc = service(Arc::new(MemoryStore::new()));
        let err = svc.upsert_monthly_goal(2024, 13, targets()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn goal_targets_follow_the_money_column() {
        let svc = service(Arc::new(MemoryStore::new()));

        let mut tiny = targets();
        tiny.concierge = Decimal::new(1, 25);
        let err = svc.upsert_annual_goal(2024, tiny).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let mut huge = targets();
        huge.rental_sales = Decimal::MAX;
        let err = svc.upsert_monthly_goal(2024, 3, huge).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn missing_annual_goal_is_no_data() {
        let svc = service(Arc::new(MemoryStore::new()));
        let err = svc.thermometer(2024).await.unwrap_err();
        assert!(matches!(err, AppError::NoData(_)));
    }

    #[tokio::test]
    async fn dashboard_joins_goals_with_sales_of_the_year() {
        let store = Arc::new(MemoryStore::with_sales(vec![
            sale("2024-01-10", dec!(6000)),
            sale("2024-02-10", dec!(4000)),
            sale("2023-12-31", dec!(99999)),
        ]));
        let svc = service(store);
        svc.upsert_annual_goal(2024, targets()).await.unwrap();
        let mut january = targets();
        january.rental_sales = dec!(5000);
        svc.upsert_monthly_goal(2024, 1, january).await.unwrap();

        let dashboard = svc.dashboard(2024).await.unwrap();

        let thermo = dashboard.thermometer.unwrap();
        let rental = &thermo.categories[0];
        assert_eq!(rental.category, GoalCategory::RentalSales);
        assert_eq!(rental.achieved, dec!(10000));
        assert_eq!(rental.status, GoalStatus::Exceeded);

        assert_eq!(dashboard.months.len(), 1);
        assert_eq!(dashboard.months[0].month, 1);
        assert_eq!(dashboard.months[0].categories[0].achieved, dec!(6000));
    }
}
