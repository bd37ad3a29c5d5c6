//! 訂購量計算（耗損緩衝 + 包裝量進位）

use restock_core::{
    DataGap, DataGapKind, Ingredient, InventorySnapshot, OrderLine, OverstockExclusion, Priority,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// 單一原料的訂購量
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuantity {
    /// 含耗損緩衝的總需求
    pub gross_need: Decimal,

    /// 扣除庫存後的淨訂購量
    pub net_to_order: Decimal,

    /// 實際建議訂購量（整包）
    pub quantity_to_order: Decimal,

    /// 包裝數（無包裝量時為 `None`）
    pub number_of_packs: Option<u32>,
}

/// 一家餐廳的訂貨計劃
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPlan {
    /// 訂貨明細（依原料ID排序）
    pub lines: Vec<OrderLine>,

    /// 超額庫存：不要訂貨
    pub overstocked: Vec<OverstockExclusion>,

    /// 預估訂貨成本（不含缺少單價的行）
    pub estimated_order_cost: Decimal,

    /// 預估節省（避免缺貨的價值）
    pub estimated_savings: Decimal,

    /// 建議優先級
    pub priority: Priority,

    /// 資料缺口
    pub gaps: Vec<DataGap>,
}

/// 訂購量計算器
pub struct OrderQuantityCalculator;

impl OrderQuantityCalculator {
    /// 計算單一原料的訂購量
    ///
    /// `gross = needed * (1 + shrink)`，`to_order = max(0, gross - stock)`；
    /// 淨訂購量為 0 時回傳 `None`（不產生「訂 0」的明細）。
    /// 有包裝量時一律無條件進位到整包。
    pub fn compute(
        needed_quantity: Decimal,
        shrink_pct: Decimal,
        current_stock: Decimal,
        pack_size: Option<Decimal>,
    ) -> Option<OrderQuantity> {
        let gross_need = needed_quantity * (Decimal::ONE + shrink_pct);
        let net_to_order = (gross_need - current_stock).max(Decimal::ZERO);

        if net_to_order <= Decimal::ZERO {
            return None;
        }

        let (quantity_to_order, number_of_packs) = match pack_size {
            Some(size) if size > Decimal::ZERO => {
                let packs = (net_to_order / size).ceil();
                // 包裝數超出 u32 時飽和；訂購量仍以精確值為準
                (packs * size, Some(packs.to_u32().unwrap_or(u32::MAX)))
            }
            _ => (net_to_order, None),
        };

        Some(OrderQuantity {
            gross_need,
            net_to_order,
            quantity_to_order,
            number_of_packs,
        })
    }

    /// 由原料需求建立訂貨計劃
    ///
    /// 超過最高門檻的原料一律排除（超額庫存優先於預測需求）。
    pub fn plan(
        needs: &BTreeMap<String, Decimal>,
        shrink_pct: Decimal,
        inventory: &HashMap<String, InventorySnapshot>,
        ingredients: &HashMap<String, Ingredient>,
    ) -> OrderPlan {
        let mut plan = OrderPlan::default();

        for (ingredient_id, &needed_quantity) in needs {
            let Some(ingredient) = ingredients.get(ingredient_id) else {
                plan.gaps.push(DataGap::new(
                    DataGapKind::UnknownIngredient,
                    ingredient_id.clone(),
                    "ingredient missing from catalog",
                ));
                continue;
            };

            let snapshot = inventory.get(ingredient_id);
            if snapshot.is_none() {
                tracing::warn!("原料 {} 沒有庫存紀錄，視為庫存 0", ingredient_id);
                plan.gaps.push(DataGap::new(
                    DataGapKind::MissingInventory,
                    ingredient_id.clone(),
                    "no inventory row, current stock treated as 0",
                ));
            }

            if let Some(snapshot) = snapshot.filter(|s| s.is_overstocked()) {
                tracing::debug!("原料 {} 超額庫存，不訂貨", ingredient_id);
                plan.overstocked.push(OverstockExclusion {
                    ingredient_id: ingredient_id.clone(),
                    current_stock: snapshot.current_stock,
                    max_threshold: snapshot.max_threshold.unwrap_or(snapshot.current_stock),
                    needed_quantity,
                });
                continue;
            }

            let current_stock = snapshot.map(|s| s.current_stock).unwrap_or(Decimal::ZERO);
            let pack_size = ingredient.effective_pack_size();

            let Some(quantity) =
                Self::compute(needed_quantity, shrink_pct, current_stock, pack_size)
            else {
                continue;
            };

            let line_cost = ingredient
                .cost_per_unit
                .map(|cost| quantity.quantity_to_order * cost);

            match ingredient.cost_per_unit {
                Some(cost) => {
                    let uncovered = (needed_quantity - current_stock).max(Decimal::ZERO);
                    plan.estimated_savings += quantity.quantity_to_order.min(uncovered) * cost;
                }
                None => plan.gaps.push(DataGap::new(
                    DataGapKind::MissingCost,
                    ingredient_id.clone(),
                    "no cost per unit, line excluded from order cost",
                )),
            }
            if let Some(cost) = line_cost {
                plan.estimated_order_cost += cost;
            }

            let line_priority = match snapshot {
                Some(s) if s.is_below_min() => Priority::High,
                _ if current_stock < needed_quantity => Priority::Medium,
                _ => Priority::Low,
            };
            plan.priority = plan.priority.max(line_priority);

            plan.lines.push(OrderLine {
                ingredient_id: ingredient_id.clone(),
                ingredient_name: ingredient.name.clone(),
                unit: ingredient.unit.clone(),
                needed_quantity,
                gross_need: quantity.gross_need,
                current_stock,
                quantity_to_order: quantity.quantity_to_order,
                pack_size,
                number_of_packs: quantity.number_of_packs,
                supplier_name: ingredient.supplier_name.clone(),
                cost_per_unit: ingredient.cost_per_unit,
                line_cost,
            });
        }

        plan
    }
}
