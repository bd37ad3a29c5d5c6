//! 警示規則引擎
//!
//! 無狀態：同樣的輸入永遠產生同樣順序的評估結果。
//! 同一家餐廳的評估與 [`reconcile`] 必須由呼叫端序列化（例如每家餐廳一把鎖，
//! 或交易式 upsert），才能維持「不重複開立」的保證；本模組本身不加鎖。

use chrono::{DateTime, NaiveDate, Utc};
use restock_core::{
    Alert, AlertFinding, AlertKey, AlertSubject, AlertType, Ingredient, InvariantKind,
    InvariantViolation, InventorySnapshot, PlannedStaffing, Severity, StaffingConfig,
    StaffingSlot,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 評估結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertEvaluation {
    /// 觸發中的條件（依原料ID、日期、時段排序）
    pub findings: Vec<AlertFinding>,

    /// 門檻倒置等不變式違反
    pub violations: Vec<InvariantViolation>,

    /// 本次評估涵蓋的排班日期
    pub evaluated_dates: BTreeSet<NaiveDate>,
}

/// 與既有警示合併後的結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// 合併後的完整警示清單（含已解除）
    pub alerts: Vec<Alert>,

    /// 有變更、需要寫回的警示
    pub changed: Vec<Alert>,

    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub resolved: usize,
}

impl Reconciliation {
    /// 仍未解除的警示
    pub fn open_alerts(&self) -> Vec<Alert> {
        self.alerts.iter().filter(|a| a.is_open()).cloned().collect()
    }
}

/// 警示規則引擎
pub struct AlertRuleEngine;

impl AlertRuleEngine {
    /// 評估庫存與排班條件
    ///
    /// `recommended` 與 `planned` 依 (日期, 時段) 配對；只有兩邊都有資料的時段才會比較。
    pub fn evaluate(
        inventory: &[InventorySnapshot],
        planned: &[PlannedStaffing],
        recommended: &[PlannedStaffing],
        ingredients: &HashMap<String, Ingredient>,
        staffing: &StaffingConfig,
    ) -> AlertEvaluation {
        let mut evaluation = AlertEvaluation::default();

        let mut sorted: Vec<&InventorySnapshot> = inventory.iter().collect();
        sorted.sort_by(|a, b| {
            (&a.restaurant_id, &a.ingredient_id).cmp(&(&b.restaurant_id, &b.ingredient_id))
        });

        for snapshot in sorted {
            if snapshot.has_inverted_thresholds() {
                tracing::warn!(
                    "原料 {} 門檻倒置：max {:?} < min {}",
                    snapshot.ingredient_id,
                    snapshot.max_threshold,
                    snapshot.min_threshold
                );
                evaluation.violations.push(InvariantViolation {
                    kind: InvariantKind::ThresholdOrder,
                    ingredient_id: snapshot.ingredient_id.clone(),
                    detail: format!(
                        "max threshold {} is below min threshold {}",
                        snapshot.max_threshold.unwrap_or_default(),
                        snapshot.min_threshold
                    ),
                });
            }

            let ingredient = ingredients.get(&snapshot.ingredient_id);
            evaluation
                .findings
                .extend(Self::shortage(snapshot, ingredient));
            evaluation
                .findings
                .extend(Self::overstock(snapshot, ingredient));
        }

        let recommended_by_slot: BTreeMap<(&str, NaiveDate, StaffingSlot), u32> = recommended
            .iter()
            .map(|r| ((r.restaurant_id.as_str(), r.plan_date, r.slot), r.planned_count))
            .collect();

        let mut plans: Vec<&PlannedStaffing> = planned.iter().collect();
        plans.sort_by(|a, b| {
            (&a.restaurant_id, a.plan_date, a.slot).cmp(&(&b.restaurant_id, b.plan_date, b.slot))
        });

        for plan in plans {
            let key = (plan.restaurant_id.as_str(), plan.plan_date, plan.slot);
            let Some(&recommended_count) = recommended_by_slot.get(&key) else {
                continue;
            };
            evaluation.evaluated_dates.insert(plan.plan_date);
            evaluation
                .findings
                .extend(Self::staffing(plan, recommended_count, staffing));
        }

        tracing::debug!(
            "警示評估：{} 筆庫存、{} 筆排班 → {} 個條件",
            inventory.len(),
            planned.len(),
            evaluation.findings.len()
        );

        evaluation
    }

    /// 缺貨規則
    ///
    /// 庫存為 0 → critical；缺口 >= 最低門檻 50% → high；其餘 → medium。
    pub fn shortage(
        snapshot: &InventorySnapshot,
        ingredient: Option<&Ingredient>,
    ) -> Option<AlertFinding> {
        if !snapshot.is_below_min() {
            return None;
        }

        let deficit = snapshot.shortfall();
        let severity = if snapshot.current_stock <= Decimal::ZERO {
            Severity::Critical
        } else if deficit * Decimal::TWO >= snapshot.min_threshold {
            Severity::High
        } else {
            Severity::Medium
        };

        let unit = ingredient.map(|i| i.unit.clone());
        let message = format!(
            "{}: stock {}{} below minimum {}{} (short {}{})",
            display_name(snapshot, ingredient),
            snapshot.current_stock.normalize(),
            unit_suffix(ingredient),
            snapshot.min_threshold.normalize(),
            unit_suffix(ingredient),
            deficit.normalize(),
            unit_suffix(ingredient),
        );

        Some(AlertFinding {
            key: ingredient_key(snapshot, AlertType::Shortage),
            severity,
            message,
            quantity_gap: deficit,
            unit,
        })
    }

    /// 超額庫存規則
    ///
    /// 超額 >= 2 倍最高門檻 → high；其餘 → medium。
    pub fn overstock(
        snapshot: &InventorySnapshot,
        ingredient: Option<&Ingredient>,
    ) -> Option<AlertFinding> {
        let max = snapshot.max_threshold?;
        if !snapshot.is_overstocked() {
            return None;
        }

        let surplus = snapshot.surplus();
        let severity = if surplus >= max * Decimal::TWO {
            Severity::High
        } else {
            Severity::Medium
        };

        let message = format!(
            "{}: stock {}{} above maximum {}{} (surplus {}{})",
            display_name(snapshot, ingredient),
            snapshot.current_stock.normalize(),
            unit_suffix(ingredient),
            max.normalize(),
            unit_suffix(ingredient),
            surplus.normalize(),
            unit_suffix(ingredient),
        );

        Some(AlertFinding {
            key: ingredient_key(snapshot, AlertType::Overstock),
            severity,
            message,
            quantity_gap: surplus,
            unit: ingredient.map(|i| i.unit.clone()),
        })
    }

    /// 排班規則
    ///
    /// 計劃 > 建議 × 過剩倍數 → OVERSTAFFING（計劃 >= 2 倍建議時 medium，否則 low）；
    /// 計劃 < 建議 × 不足倍數 → UNDERSTAFFING（計劃 <= 建議一半時 high，否則 medium）。
    pub fn staffing(
        plan: &PlannedStaffing,
        recommended_count: u32,
        config: &StaffingConfig,
    ) -> Option<AlertFinding> {
        let planned = Decimal::from(plan.planned_count);
        let recommended = Decimal::from(recommended_count);
        let subject = AlertSubject::Slot {
            date: plan.plan_date,
            slot: plan.slot,
        };

        let (alert_type, severity) = if planned > recommended * config.overstaffing_ratio {
            let severity = if recommended_count == 0 || planned >= recommended * Decimal::TWO {
                Severity::Medium
            } else {
                Severity::Low
            };
            (AlertType::Overstaffing, severity)
        } else if planned < recommended * config.understaffing_ratio {
            let severity = if planned * Decimal::TWO <= recommended {
                Severity::High
            } else {
                Severity::Medium
            };
            (AlertType::Understaffing, severity)
        } else {
            return None;
        };

        let gap = (i64::from(plan.planned_count) - i64::from(recommended_count)).abs();
        let message = format!(
            "{} {}: {} staff planned, {} recommended",
            plan.plan_date, plan.slot, plan.planned_count, recommended_count
        );

        Some(AlertFinding {
            key: AlertKey {
                restaurant_id: plan.restaurant_id.clone(),
                subject,
                alert_type,
            },
            severity,
            message,
            quantity_gap: Decimal::from(gap),
            unit: None,
        })
    }
}

/// 將評估結果與既有警示合併
///
/// 以 (restaurant, subject, type) 為鍵：
/// - 有條件、無未解除警示 → 開立新警示
/// - 有條件、有未解除警示 → 更新訊息/嚴重度（沒有變化則不動）
/// - 無條件、有未解除警示 → 標記為已解除（原料警示一律在範圍內；
///   排班警示只有在該日期本次有評估時才會解除）
///
/// 警示歷史不會被刪除；同一鍵若有多筆未解除警示，保留最早的一筆，其餘解除。
pub fn reconcile(
    existing: Vec<Alert>,
    evaluation: &AlertEvaluation,
    now: DateTime<Utc>,
) -> Reconciliation {
    let mut result = Reconciliation::default();
    let findings: BTreeMap<AlertKey, &AlertFinding> = evaluation
        .findings
        .iter()
        .map(|f| (f.key.clone(), f))
        .collect();

    let mut alerts = existing;
    alerts.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.key().cmp(&b.key()))
            .then(a.id.cmp(&b.id))
    });

    let today = now.date_naive();
    let mut matched: BTreeSet<AlertKey> = BTreeSet::new();
    for alert in alerts.iter_mut().filter(|a| a.is_open()) {
        let key = alert.key();

        if matched.contains(&key) {
            alert.resolve(now);
            result.resolved += 1;
            result.changed.push(alert.clone());
            continue;
        }

        match findings.get(&key) {
            Some(finding) => {
                matched.insert(key);
                if alert.refresh(finding, now) {
                    result.updated += 1;
                    result.changed.push(alert.clone());
                } else {
                    result.unchanged += 1;
                }
            }
            None if in_scope(&alert.subject, evaluation, today) => {
                alert.resolve(now);
                result.resolved += 1;
                result.changed.push(alert.clone());
            }
            None => result.unchanged += 1,
        }
    }

    for (key, finding) in &findings {
        if !matched.contains(key) {
            let alert = Alert::open((*finding).clone(), now);
            result.created += 1;
            result.changed.push(alert.clone());
            alerts.push(alert);
        }
    }

    tracing::debug!(
        "警示合併：新增 {}，更新 {}，不變 {}，解除 {}",
        result.created,
        result.updated,
        result.unchanged,
        result.resolved
    );

    result.alerts = alerts;
    result
}

/// 未評估的排班日期只有在已經過去時才解除
fn in_scope(subject: &AlertSubject, evaluation: &AlertEvaluation, today: NaiveDate) -> bool {
    match subject {
        AlertSubject::Ingredient { .. } => true,
        AlertSubject::Slot { date, .. } => *date < today || evaluation.evaluated_dates.contains(date),
    }
}

fn ingredient_key(snapshot: &InventorySnapshot, alert_type: AlertType) -> AlertKey {
    AlertKey {
        restaurant_id: snapshot.restaurant_id.clone(),
        subject: AlertSubject::Ingredient {
            ingredient_id: snapshot.ingredient_id.clone(),
        },
        alert_type,
    }
}

fn display_name<'a>(snapshot: &'a InventorySnapshot, ingredient: Option<&'a Ingredient>) -> &'a str {
    ingredient
        .map(|i| i.name.as_str())
        .unwrap_or(snapshot.ingredient_id.as_str())
}

fn unit_suffix(ingredient: Option<&Ingredient>) -> String {
    ingredient
        .map(|i| format!(" {}", i.unit))
        .unwrap_or_default()
}
