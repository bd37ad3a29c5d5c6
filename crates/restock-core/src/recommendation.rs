//! 建議模型（訂貨 / 排班）

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::issues::DataGap;
use crate::staffing::{PlannedStaffing, SlotStaffing};
use crate::units::Unit;
use crate::{EngineError, Result};

/// 建議類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    /// 訂貨
    Order,
    /// 排班
    Staffing,
}

/// 優先級
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

/// 建議狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    /// 待處理
    Pending,
    /// 已接受（終態）
    Accepted,
    /// 已忽略（終態）
    Dismissed,
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Accepted => "accepted",
            RecommendationStatus::Dismissed => "dismissed",
        };
        f.write_str(label)
    }
}

/// 訂貨明細行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// 原料ID
    pub ingredient_id: String,

    /// 原料名稱
    pub ingredient_name: String,

    /// 原料正規單位
    pub unit: Unit,

    /// 預測期間需求量
    pub needed_quantity: Decimal,

    /// 含耗損緩衝的總需求
    pub gross_need: Decimal,

    /// 現有庫存
    pub current_stock: Decimal,

    /// 建議訂購量（已依包裝量進位）
    pub quantity_to_order: Decimal,

    /// 供應商包裝量
    pub pack_size: Option<Decimal>,

    /// 包裝數
    pub number_of_packs: Option<u32>,

    /// 供應商名稱
    pub supplier_name: Option<String>,

    /// 單價
    pub cost_per_unit: Option<Decimal>,

    /// 小計（缺少單價時為 `None`）
    pub line_cost: Option<Decimal>,
}

/// 因超額庫存而排除的原料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverstockExclusion {
    pub ingredient_id: String,
    pub current_stock: Decimal,
    pub max_threshold: Decimal,
    pub needed_quantity: Decimal,
}

/// 訂貨建議內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecommendationData {
    /// 耗損緩衝比例
    pub shrink_pct: Decimal,

    /// 銷售回溯天數
    pub window_days: u32,

    /// 預測天數
    pub horizon_days: u32,

    /// 訂貨明細（依原料ID排序）
    pub lines: Vec<OrderLine>,

    /// 超額庫存：不要訂貨
    pub overstocked: Vec<OverstockExclusion>,

    /// 預估訂貨成本
    pub estimated_order_cost: Decimal,

    /// 預估節省（避免缺貨的價值）
    pub estimated_savings: Decimal,

    /// 計算過程中收集的資料缺口
    pub data_gaps: Vec<DataGap>,
}

/// 排班建議內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingRecommendationData {
    /// 目標日期
    pub target_date: NaiveDate,

    /// 各時段建議
    pub slots: Vec<SlotStaffing>,

    /// 實際採用的歷史天數（不同營業日數）
    pub history_days: u32,

    /// 被略過的銷售紀錄
    #[serde(default)]
    pub data_gaps: Vec<DataGap>,
}

/// 建議內容（依類型區分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationData {
    Order(OrderRecommendationData),
    Staffing(StaffingRecommendationData),
}

impl RecommendationData {
    /// 對應的建議類型
    pub fn recommendation_type(&self) -> RecommendationType {
        match self {
            RecommendationData::Order(_) => RecommendationType::Order,
            RecommendationData::Staffing(_) => RecommendationType::Staffing,
        }
    }
}

/// 入庫明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReceipt {
    pub ingredient_id: String,
    pub quantity: Decimal,
}

/// 接受建議後需要回寫到外部的變更
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WriteBack {
    /// 庫存增加
    InventoryReceipt {
        restaurant_id: String,
        receipts: Vec<StockReceipt>,
    },
    /// 人力計劃覆寫
    StaffingPlan(Vec<PlannedStaffing>),
}

/// 建議
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 建議ID
    pub id: Uuid,

    /// 餐廳ID
    pub restaurant_id: String,

    /// 建議內容
    pub data: RecommendationData,

    /// 優先級
    pub priority: Priority,

    /// 狀態
    pub status: RecommendationStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recommendation {
    /// 創建新的待處理建議
    pub fn new(restaurant_id: String, data: RecommendationData, priority: Priority, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            restaurant_id,
            data,
            priority,
            status: RecommendationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// 建議類型
    pub fn recommendation_type(&self) -> RecommendationType {
        self.data.recommendation_type()
    }

    /// 檢查是否已接受
    pub fn is_accepted(&self) -> bool {
        self.status == RecommendationStatus::Accepted
    }

    /// 接受建議，回傳需要回寫的變更
    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<WriteBack> {
        self.transition(RecommendationStatus::Accepted, now)?;

        let write_back = match &self.data {
            RecommendationData::Order(order) => WriteBack::InventoryReceipt {
                restaurant_id: self.restaurant_id.clone(),
                receipts: order
                    .lines
                    .iter()
                    .map(|line| StockReceipt {
                        ingredient_id: line.ingredient_id.clone(),
                        quantity: line.quantity_to_order,
                    })
                    .collect(),
            },
            RecommendationData::Staffing(staffing) => WriteBack::StaffingPlan(
                staffing
                    .slots
                    .iter()
                    .map(|slot| {
                        PlannedStaffing::new(
                            self.restaurant_id.clone(),
                            staffing.target_date,
                            slot.slot,
                            slot.recommended_count,
                        )
                    })
                    .collect(),
            ),
        };

        Ok(write_back)
    }

    /// 忽略建議
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(RecommendationStatus::Dismissed, now)
    }

    fn transition(&mut self, to: RecommendationStatus, now: DateTime<Utc>) -> Result<()> {
        if self.status != RecommendationStatus::Pending {
            return Err(EngineError::InvalidTransition {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}
