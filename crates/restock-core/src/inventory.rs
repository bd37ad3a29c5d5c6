//! 庫存模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Result};

/// 餐廳原料庫存快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// 餐廳ID
    pub restaurant_id: String,

    /// 原料ID
    pub ingredient_id: String,

    /// 現有庫存（原料正規單位）
    pub current_stock: Decimal,

    /// 最低庫存門檻
    pub min_threshold: Decimal,

    /// 最高庫存門檻
    pub max_threshold: Option<Decimal>,

    /// 最後更新時間
    pub last_updated: DateTime<Utc>,
}

impl InventorySnapshot {
    /// 創建新的庫存快照
    pub fn new(
        restaurant_id: String,
        ingredient_id: String,
        current_stock: Decimal,
        min_threshold: Decimal,
    ) -> Self {
        Self {
            restaurant_id,
            ingredient_id,
            current_stock,
            min_threshold,
            max_threshold: None,
            last_updated: Utc::now(),
        }
    }

    /// 建構器模式：設置最高門檻
    pub fn with_max_threshold(mut self, max_threshold: Decimal) -> Self {
        self.max_threshold = Some(max_threshold);
        self
    }

    /// 建構器模式：設置更新時間
    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// 檢查庫存是否低於最低門檻
    pub fn is_below_min(&self) -> bool {
        self.current_stock < self.min_threshold
    }

    /// 低於最低門檻的缺口
    pub fn shortfall(&self) -> Decimal {
        if self.is_below_min() {
            self.min_threshold - self.current_stock
        } else {
            Decimal::ZERO
        }
    }

    /// 檢查庫存是否高於最高門檻
    pub fn is_overstocked(&self) -> bool {
        matches!(self.max_threshold, Some(max) if self.current_stock > max)
    }

    /// 高於最高門檻的超額
    pub fn surplus(&self) -> Decimal {
        match self.max_threshold {
            Some(max) if self.current_stock > max => self.current_stock - max,
            _ => Decimal::ZERO,
        }
    }

    /// 門檻是否倒置（max < min）
    pub fn has_inverted_thresholds(&self) -> bool {
        matches!(self.max_threshold, Some(max) if max < self.min_threshold)
    }

    /// 入庫（接受訂貨建議後的回寫）
    pub fn receive(&mut self, quantity: Decimal, at: DateTime<Utc>) -> Result<()> {
        if quantity < Decimal::ZERO {
            return Err(EngineError::InvalidQuantity(quantity));
        }
        self.current_stock += quantity;
        self.last_updated = at;
        Ok(())
    }
}
