//! 產品需求彙總

use chrono::{Duration, NaiveDate};
use restock_core::SalesRecord;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// 單一產品在回溯期間的需求
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDemand {
    /// 回溯期間總銷售量
    pub total_quantity: Decimal,

    /// 每日平均銷售量
    pub daily_average: Decimal,

    /// 實際使用的回溯天數（>= 1）
    pub window_days: u32,
}

impl ProductDemand {
    /// 換算到預測天數的需求量
    ///
    /// 先乘後除，避免 `daily_average * horizon` 的循環小數誤差。
    pub fn for_horizon(&self, horizon_days: u32) -> Decimal {
        self.total_quantity * Decimal::from(horizon_days) / Decimal::from(self.window_days)
    }
}

/// 需求彙總器
pub struct DemandAggregator;

impl DemandAggregator {
    /// 彙總回溯期間內每個產品的需求
    ///
    /// 只計入 `as_of - window_days <= sale_date <= as_of` 的銷售；
    /// 回溯期間內沒有銷售的產品不會出現在結果中（不是 0）。
    /// `window_days < 1` 會被修正為 1。
    pub fn aggregate(
        sales: &[SalesRecord],
        window_days: i64,
        as_of: NaiveDate,
    ) -> BTreeMap<String, ProductDemand> {
        let window = Self::clamp_window(window_days);
        let since = Self::window_start(as_of, window);

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for sale in sales.iter().filter(|s| s.is_within(since, as_of)) {
            *totals.entry(sale.product_id.clone()).or_insert(Decimal::ZERO) += sale.quantity_sold;
        }

        tracing::debug!(
            "需求彙總：{} 筆銷售，{} 個產品，回溯 {} 天（自 {}）",
            sales.len(),
            totals.len(),
            window,
            since
        );

        totals
            .into_iter()
            .map(|(product_id, total_quantity)| {
                let demand = ProductDemand {
                    total_quantity,
                    daily_average: total_quantity / Decimal::from(window),
                    window_days: window,
                };
                (product_id, demand)
            })
            .collect()
    }

    /// 回溯期間起始日
    pub fn window_start(as_of: NaiveDate, window_days: u32) -> NaiveDate {
        as_of - Duration::days(i64::from(window_days))
    }

    fn clamp_window(window_days: i64) -> u32 {
        if window_days < 1 {
            tracing::warn!("回溯天數 {} 無效，修正為 1", window_days);
            1
        } else {
            u32::try_from(window_days).unwrap_or(u32::MAX)
        }
    }
}
