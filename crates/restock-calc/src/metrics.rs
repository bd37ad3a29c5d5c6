//! 管理層指標彙總（本月 vs 上月）

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use restock_core::{
    Alert, AlertType, EngineConfig, Ingredient, InventorySnapshot, Recommendation,
    RecommendationStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::impact::{Estimate, ImpactEstimator};

/// 報表期間：`[start, end)` 的一個日曆月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// 包含指定日期的日曆月
    pub fn month_of(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = first_of_month(start + Duration::days(32));
        Self { start, end }
    }

    /// 前一個日曆月
    pub fn previous(&self) -> Self {
        Self::month_of(self.start - Duration::days(1))
    }

    /// 檢查時間點是否落在期間內
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let date = at.date_naive();
        date >= self.start && date < self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// 管理層指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub organization_id: String,

    /// 單一餐廳報表時的餐廳ID
    pub restaurant_id: Option<String>,

    pub period: ReportingPeriod,

    /// 本月已接受建議的預估節省
    pub estimated_savings: Estimate,

    /// 上月已接受建議的預估節省
    pub previous_savings: Estimate,

    /// 節省變化百分比（上月為 0 時為 `None`）
    pub savings_change_pct: Option<Decimal>,

    pub accepted_recommendations: usize,
    pub previous_accepted_recommendations: usize,

    pub open_alerts: usize,

    /// 未解除的 high / critical 警示數
    pub high_risk_alerts: usize,

    /// 高風險警示的影響金額合計
    pub high_risk_exposure: Estimate,

    /// 超額庫存的預估浪費
    pub estimated_waste: Estimate,
}

/// 彙總所需的資料（可跨多家餐廳）
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    pub recommendations: &'a [Recommendation],
    pub alerts: &'a [Alert],
    pub inventory: &'a [InventorySnapshot],
    pub ingredients: &'a HashMap<String, Ingredient>,
}

/// 指標彙總器
pub struct MetricsRollup;

impl MetricsRollup {
    /// 計算指標
    pub fn summarize(
        organization_id: &str,
        restaurant_id: Option<&str>,
        input: MetricsInput<'_>,
        as_of: DateTime<Utc>,
        config: &EngineConfig,
    ) -> MetricsSummary {
        let estimator = ImpactEstimator::new(input.ingredients, &config.staffing, &config.heuristics);
        let period = ReportingPeriod::month_of(as_of.date_naive());
        let previous = period.previous();

        let accepted_in = |p: ReportingPeriod| {
            input
                .recommendations
                .iter()
                .filter(|r| r.status == RecommendationStatus::Accepted && p.contains(r.updated_at))
                .collect::<Vec<_>>()
        };
        let current_accepted = accepted_in(period);
        let previous_accepted = accepted_in(previous);

        let estimated_savings: Estimate = current_accepted
            .iter()
            .map(|r| estimator.recommendation(r))
            .sum();
        let previous_savings: Estimate = previous_accepted
            .iter()
            .map(|r| estimator.recommendation(r))
            .sum();

        let open: Vec<&Alert> = input.alerts.iter().filter(|a| a.is_open()).collect();
        let high_risk: Vec<&Alert> = open
            .iter()
            .copied()
            .filter(|a| a.severity.is_high_risk())
            .collect();
        let high_risk_exposure: Estimate = high_risk.iter().map(|a| estimator.alert(a)).sum();

        let estimated_waste = Self::estimated_waste(&input, &open, &estimator, config);

        MetricsSummary {
            organization_id: organization_id.to_string(),
            restaurant_id: restaurant_id.map(str::to_string),
            period,
            savings_change_pct: change_pct(estimated_savings.amount, previous_savings.amount),
            estimated_savings,
            previous_savings,
            accepted_recommendations: current_accepted.len(),
            previous_accepted_recommendations: previous_accepted.len(),
            open_alerts: open.len(),
            high_risk_alerts: high_risk.len(),
            high_risk_exposure,
            estimated_waste,
        }
    }

    /// 超額庫存浪費
    ///
    /// 有庫存資料時：Σ (現有庫存 − 最高門檻) × 單價，缺少單價的原料以每筆啟發式常數計。
    /// 沒有庫存資料時：未解除超額庫存警示數 × 啟發式常數。
    fn estimated_waste(
        input: &MetricsInput<'_>,
        open_alerts: &[&Alert],
        estimator: &ImpactEstimator<'_>,
        config: &EngineConfig,
    ) -> Estimate {
        let per_item = config.heuristics.waste_per_overstock_alert;

        if input.inventory.is_empty() {
            let count = open_alerts
                .iter()
                .filter(|a| a.alert_type == AlertType::Overstock)
                .count();
            if count == 0 {
                return Estimate::zero();
            }
            return Estimate::heuristic(Decimal::from(count) * per_item);
        }

        input
            .inventory
            .iter()
            .filter(|s| s.is_overstocked())
            .map(|s| match estimator.cost_per_unit(&s.ingredient_id) {
                Some(cost) => Estimate::computed(s.surplus() * cost),
                None => Estimate::heuristic(per_item),
            })
            .sum()
    }
}

/// (本期 − 上期) / 上期 × 100，四捨五入到小數兩位
pub fn change_pct(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(2))
}
