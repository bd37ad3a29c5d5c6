//! 排班建議：歷史銷售分時段 → 各時段建議人數

use chrono::{Datelike, Duration, NaiveDate};
use restock_core::{
    AlertType, DataGap, DataGapKind, PlannedStaffing, Priority, SalesRecord, SlotStaffing,
    StaffingConfig, StaffingRecommendationData, StaffingSlot,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::alerts::AlertRuleEngine;

/// 排班建議結果
#[derive(Debug, Clone, PartialEq)]
pub struct StaffingPlan {
    pub data: StaffingRecommendationData,
    pub priority: Priority,
}

impl StaffingPlan {
    /// 以建議人數表示的人力計劃列（供警示比較或回寫）
    pub fn as_planned_rows(&self, restaurant_id: &str) -> Vec<PlannedStaffing> {
        self.data
            .slots
            .iter()
            .map(|slot| {
                PlannedStaffing::new(
                    restaurant_id.to_string(),
                    self.data.target_date,
                    slot.slot,
                    slot.recommended_count,
                )
            })
            .collect()
    }
}

/// 排班建議計算結果
#[derive(Debug, Clone, PartialEq)]
pub enum StaffingOutcome {
    Recommended(StaffingPlan),
    /// 歷史期間內沒有可用的銷售
    NoHistory(Vec<DataGap>),
}

/// 排班建議器
pub struct StaffingRecommender;

impl StaffingRecommender {
    /// 計算目標日期的各時段建議人數
    ///
    /// 歷史期間為 `[target - history_days, target)`。若期間內有與目標日期同星期的營業日，
    /// 只採用那些日子；否則採用全部營業日。
    /// 建議人數 = ceil(時段日均銷售量 / 每人處理量)，再限制在時段上下限內。
    pub fn recommend(
        sales: &[SalesRecord],
        target_date: NaiveDate,
        planned: &[PlannedStaffing],
        config: &StaffingConfig,
    ) -> StaffingOutcome {
        let since = target_date - Duration::days(i64::from(config.history_days));
        let mut gaps = Vec::new();

        let mut history: Vec<(&SalesRecord, StaffingSlot)> = Vec::new();
        for sale in sales {
            if sale.sale_date < since || sale.sale_date >= target_date {
                continue;
            }
            match sale.slot() {
                Some(slot) => history.push((sale, slot)),
                None => {
                    tracing::warn!(
                        "銷售紀錄 {} @ {} 的時數 {} 無效，略過",
                        sale.product_id,
                        sale.sale_date,
                        sale.sale_hour
                    );
                    gaps.push(DataGap::new(
                        DataGapKind::InvalidSaleHour,
                        sale.product_id.clone(),
                        format!("sale on {} has hour {}", sale.sale_date, sale.sale_hour),
                    ));
                }
            }
        }

        let all_days: BTreeSet<NaiveDate> = history.iter().map(|(s, _)| s.sale_date).collect();
        let same_weekday: BTreeSet<NaiveDate> = all_days
            .iter()
            .copied()
            .filter(|d| d.weekday() == target_date.weekday())
            .collect();
        let days = if same_weekday.is_empty() {
            all_days
        } else {
            same_weekday
        };

        if days.is_empty() {
            tracing::info!("{} 之前 {} 天內沒有銷售歷史", target_date, config.history_days);
            return StaffingOutcome::NoHistory(gaps);
        }

        let mut volume: BTreeMap<StaffingSlot, Decimal> = BTreeMap::new();
        for (sale, slot) in history.iter().filter(|(s, _)| days.contains(&s.sale_date)) {
            *volume.entry(*slot).or_insert(Decimal::ZERO) += sale.quantity_sold;
        }

        let planned_by_slot: BTreeMap<StaffingSlot, u32> = planned
            .iter()
            .filter(|p| p.plan_date == target_date)
            .map(|p| (p.slot, p.planned_count))
            .collect();

        let day_count = Decimal::from(days.len());
        let slots: Vec<SlotStaffing> = StaffingSlot::ALL
            .into_iter()
            .map(|slot| {
                let average_volume = volume.get(&slot).copied().unwrap_or(Decimal::ZERO) / day_count;
                let recommended_count = Self::headcount(average_volume, slot, config);
                tracing::debug!(
                    "時段 {}: 日均 {} → 建議 {} 人",
                    slot,
                    average_volume.round_dp(2),
                    recommended_count
                );
                SlotStaffing {
                    slot,
                    average_volume,
                    recommended_count,
                    planned_count: planned_by_slot.get(&slot).copied(),
                }
            })
            .collect();

        let priority = Self::priority(&slots, target_date, config);
        let history_days = u32::try_from(days.len()).unwrap_or(u32::MAX);

        StaffingOutcome::Recommended(StaffingPlan {
            data: StaffingRecommendationData {
                target_date,
                slots,
                history_days,
                data_gaps: gaps,
            },
            priority,
        })
    }

    /// 單一時段建議人數
    pub fn headcount(average_volume: Decimal, slot: StaffingSlot, config: &StaffingConfig) -> u32 {
        let raw = (average_volume / config.units_per_staff)
            .ceil()
            .to_u32()
            .unwrap_or(u32::MAX);
        config.slot_bounds.bounds(slot).clamp(raw)
    }

    /// 任一時段人力不足 → high；任一時段人力過剩 → medium；否則 low
    fn priority(slots: &[SlotStaffing], target_date: NaiveDate, config: &StaffingConfig) -> Priority {
        let mut priority = Priority::Low;
        for slot in slots {
            let Some(planned_count) = slot.planned_count else {
                continue;
            };
            let row = PlannedStaffing::new(String::new(), target_date, slot.slot, planned_count);
            match AlertRuleEngine::staffing(&row, slot.recommended_count, config)
                .map(|f| f.key.alert_type)
            {
                Some(AlertType::Understaffing) => return Priority::High,
                Some(AlertType::Overstaffing) => priority = Priority::Medium,
                _ => {}
            }
        }
        priority
    }
}
