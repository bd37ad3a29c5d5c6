//! 配方（BOM）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// 配方行：一單位產品消耗的原料數量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    /// 產品ID
    pub product_id: String,

    /// 原料ID
    pub ingredient_id: String,

    /// 每單位產品用量
    pub quantity_needed: Decimal,

    /// 用量單位（未設定時使用原料本身的單位）
    pub unit: Option<Unit>,
}

impl RecipeLine {
    /// 創建新的配方行
    pub fn new(product_id: String, ingredient_id: String, quantity_needed: Decimal) -> Self {
        Self {
            product_id,
            ingredient_id,
            quantity_needed,
            unit: None,
        }
    }

    /// 建構器模式：設置用量單位
    pub fn with_unit(mut self, unit: impl Into<Unit>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}
