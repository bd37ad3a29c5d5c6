//! 非致命問題：資料缺口、不變式違反、無建議原因
//!
//! 這些都以資料形式隨部分結果一起回傳，不會中斷整批計算。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 資料缺口類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataGapKind {
    /// 有銷售但沒有配方
    MissingRecipe,
    /// 缺少單價
    MissingCost,
    /// 單位無法換算
    UnitConversion,
    /// 配方引用了目錄中不存在的原料
    UnknownIngredient,
    /// 原料沒有庫存紀錄
    MissingInventory,
    /// 銷售時數無效
    InvalidSaleHour,
}

/// 資料缺口（逐行收集）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataGap {
    /// 缺口類型
    pub kind: DataGapKind,

    /// 受影響對象（產品ID或原料ID）
    pub subject: String,

    /// 說明
    pub detail: String,
}

impl DataGap {
    /// 創建新的資料缺口
    pub fn new(kind: DataGapKind, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for DataGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} [{}]: {}", self.kind, self.subject, self.detail)
    }
}

/// 不變式違反類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantKind {
    /// max_threshold < min_threshold
    ThresholdOrder,
}

/// 不變式違反（記錄日誌後照常評估）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub kind: InvariantKind,
    pub ingredient_id: String,
    pub detail: String,
}

/// 未產生建議的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoRecommendationReason {
    /// 回溯期間內沒有任何銷售
    NoRecentSales,
    /// 有銷售，但沒有任何可用的配方行
    NoRecipesWithRecentSales,
    /// 庫存已足夠（或皆為超額庫存）
    StockAlreadySufficient,
    /// 沒有排班所需的銷售歷史
    NoStaffingHistory,
}

impl NoRecommendationReason {
    /// 給使用者看的說明
    pub fn message(&self) -> &'static str {
        match self {
            NoRecommendationReason::NoRecentSales => "no recent sales",
            NoRecommendationReason::NoRecipesWithRecentSales => "no recipes with recent sales",
            NoRecommendationReason::StockAlreadySufficient => "stock already sufficient",
            NoRecommendationReason::NoStaffingHistory => "no sales history for staffing",
        }
    }
}

impl fmt::Display for NoRecommendationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
