//! 財務影響估算
//!
//! 優先以原料單價與結構化缺口計算（computed），
//! 只有缺少成本基礎時才退回啟發式常數（heuristic）。兩種路徑在輸出中可區分。

use restock_core::{
    Alert, AlertSubject, AlertType, HeuristicCosts, Ingredient, Recommendation, RecommendationData,
    StaffingConfig,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 估算依據
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactBasis {
    Computed,
    Heuristic,
}

/// 金額估算（€）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub amount: Decimal,
    pub basis: ImpactBasis,
}

impl Estimate {
    pub fn computed(amount: Decimal) -> Self {
        Self {
            amount,
            basis: ImpactBasis::Computed,
        }
    }

    pub fn heuristic(amount: Decimal) -> Self {
        Self {
            amount,
            basis: ImpactBasis::Heuristic,
        }
    }

    /// 零（computed）
    pub fn zero() -> Self {
        Self::computed(Decimal::ZERO)
    }

    /// 加總；任一方為啟發式時結果視為啟發式
    pub fn combine(self, other: Estimate) -> Self {
        let basis = if self.basis == ImpactBasis::Heuristic || other.basis == ImpactBasis::Heuristic {
            ImpactBasis::Heuristic
        } else {
            ImpactBasis::Computed
        };
        Self {
            amount: self.amount + other.amount,
            basis,
        }
    }
}

impl Default for Estimate {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::iter::Sum for Estimate {
    fn sum<I: Iterator<Item = Estimate>>(iter: I) -> Self {
        iter.fold(Estimate::zero(), Estimate::combine)
    }
}

/// 財務影響估算器
pub struct ImpactEstimator<'a> {
    ingredients: &'a HashMap<String, Ingredient>,
    staffing: &'a StaffingConfig,
    heuristics: &'a HeuristicCosts,
}

impl<'a> ImpactEstimator<'a> {
    pub fn new(
        ingredients: &'a HashMap<String, Ingredient>,
        staffing: &'a StaffingConfig,
        heuristics: &'a HeuristicCosts,
    ) -> Self {
        Self {
            ingredients,
            staffing,
            heuristics,
        }
    }

    /// 警示的影響金額
    ///
    /// 庫存警示：缺口換算到原料單位後 × 單價。
    /// 人力警示：人數差 × 時薪 × 時段時數。
    pub fn alert(&self, alert: &Alert) -> Estimate {
        match &alert.subject {
            AlertSubject::Ingredient { ingredient_id } => self
                .ingredient_value(ingredient_id, alert)
                .map(Estimate::computed)
                .unwrap_or_else(|| {
                    tracing::debug!("警示 {} 缺少成本基礎，使用啟發式金額", alert.id);
                    Estimate::heuristic(self.alert_heuristic(alert.alert_type))
                }),
            AlertSubject::Slot { slot, .. } => Estimate::computed(
                alert.quantity_gap
                    * self.staffing.hourly_cost
                    * Decimal::from(slot.duration_hours()),
            ),
        }
    }

    /// 已接受建議的節省金額
    ///
    /// 訂貨：每行都有單價時使用預估節省，否則使用啟發式常數。
    /// 排班：避免的過剩人力成本；沒有任何時段有計劃人數時使用啟發式常數。
    pub fn recommendation(&self, recommendation: &Recommendation) -> Estimate {
        match &recommendation.data {
            RecommendationData::Order(order) => {
                let fully_costed =
                    !order.lines.is_empty() && order.lines.iter().all(|l| l.line_cost.is_some());
                if fully_costed {
                    Estimate::computed(order.estimated_savings)
                } else {
                    Estimate::heuristic(self.heuristics.accepted_recommendation)
                }
            }
            RecommendationData::Staffing(staffing) => {
                if staffing.slots.iter().all(|s| s.planned_count.is_none()) {
                    return Estimate::heuristic(self.heuristics.accepted_recommendation);
                }
                let amount = staffing
                    .slots
                    .iter()
                    .filter_map(|s| {
                        let surplus = s.planned_count?.saturating_sub(s.recommended_count);
                        Some(
                            Decimal::from(surplus)
                                * self.staffing.hourly_cost
                                * Decimal::from(s.slot.duration_hours()),
                        )
                    })
                    .sum();
                Estimate::computed(amount)
            }
        }
    }

    /// 原料的單價（無單價時為 `None`）
    pub fn cost_per_unit(&self, ingredient_id: &str) -> Option<Decimal> {
        self.ingredients.get(ingredient_id)?.cost_per_unit
    }

    fn ingredient_value(&self, ingredient_id: &str, alert: &Alert) -> Option<Decimal> {
        let ingredient = self.ingredients.get(ingredient_id)?;
        let cost = ingredient.cost_per_unit?;
        let gap = match &alert.unit {
            Some(unit) => unit.convert(alert.quantity_gap, &ingredient.unit)?,
            None => alert.quantity_gap,
        };
        Some(gap * cost)
    }

    fn alert_heuristic(&self, alert_type: AlertType) -> Decimal {
        match alert_type {
            AlertType::Shortage => self.heuristics.shortage_alert,
            AlertType::Overstock => self.heuristics.overstock_alert,
            AlertType::Overstaffing | AlertType::Understaffing => self.heuristics.staffing_alert,
        }
    }
}
