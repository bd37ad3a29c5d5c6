//! 目錄參考資料（餐廳、原料）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// 餐廳（隸屬於單一組織）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// 餐廳ID
    pub id: String,

    /// 組織ID
    pub organization_id: String,

    /// 名稱
    pub name: String,
}

impl Restaurant {
    /// 創建新的餐廳
    pub fn new(id: String, organization_id: String, name: String) -> Self {
        Self {
            id,
            organization_id,
            name,
        }
    }
}

/// 原料目錄資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// 原料ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 正規單位（庫存、包裝、單價皆以此單位表示）
    pub unit: Unit,

    /// 單價（每單位）
    pub cost_per_unit: Option<Decimal>,

    /// 供應商包裝量
    pub pack_size: Option<Decimal>,

    /// 供應商名稱
    pub supplier_name: Option<String>,
}

impl Ingredient {
    /// 創建新的原料
    pub fn new(id: String, name: String, unit: impl Into<Unit>) -> Self {
        Self {
            id,
            name,
            unit: unit.into(),
            cost_per_unit: None,
            pack_size: None,
            supplier_name: None,
        }
    }

    /// 建構器模式：設置單價
    pub fn with_cost_per_unit(mut self, cost: Decimal) -> Self {
        self.cost_per_unit = Some(cost);
        self
    }

    /// 建構器模式：設置包裝量
    pub fn with_pack_size(mut self, pack_size: Decimal) -> Self {
        self.pack_size = Some(pack_size);
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_name: String) -> Self {
        self.supplier_name = Some(supplier_name);
        self
    }

    /// 有效包裝量（必須大於 0）
    pub fn effective_pack_size(&self) -> Option<Decimal> {
        self.pack_size.filter(|size| *size > Decimal::ZERO)
    }
}
