//! # Restock Core
//!
//! 補貨與營運警示引擎的核心資料模型與類型定義

pub mod alert;
pub mod catalog;
pub mod config;
pub mod inventory;
pub mod issues;
pub mod recipe;
pub mod recommendation;
pub mod sales;
pub mod staffing;
pub mod units;

// Re-export 主要類型
pub use alert::{Alert, AlertFinding, AlertKey, AlertSubject, AlertType, Severity};
pub use catalog::{Ingredient, Restaurant};
pub use config::{EngineConfig, HeuristicCosts, SlotBoundsTable, StaffBounds, StaffingConfig};
pub use inventory::InventorySnapshot;
pub use issues::{DataGap, DataGapKind, InvariantKind, InvariantViolation, NoRecommendationReason};
pub use recipe::RecipeLine;
pub use recommendation::{
    OrderLine, OrderRecommendationData, OverstockExclusion, Priority, Recommendation,
    RecommendationData, RecommendationStatus, RecommendationType, StaffingRecommendationData,
    StockReceipt, WriteBack,
};
pub use sales::SalesRecord;
pub use staffing::{PlannedStaffing, SlotStaffing, StaffingSlot};
pub use units::Unit;

use rust_decimal::Decimal;
use uuid::Uuid;

/// 引擎錯誤類型（僅限單次呼叫致命的錯誤）
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("無效的回溯天數: {0}（必須 >= 1）")]
    InvalidWindow(i64),

    #[error("找不到餐廳: {0}")]
    UnknownRestaurant(String),

    #[error("餐廳 {restaurant_id} 不屬於組織 {organization_id}")]
    RestaurantOutsideOrganization {
        restaurant_id: String,
        organization_id: String,
    },

    #[error("無效的耗損比例: {0}")]
    InvalidShrink(Decimal),

    #[error("無效的數量: {0}")]
    InvalidQuantity(Decimal),

    #[error("建議 {id} 無法從 {from} 轉為 {to}")]
    InvalidTransition {
        id: Uuid,
        from: RecommendationStatus,
        to: RecommendationStatus,
    },

    #[error("找不到建議: {0}")]
    RecommendationNotFound(Uuid),

    #[error("配置錯誤: {0}")]
    InvalidConfig(String),

    #[error("儲存層錯誤: {0}")]
    Storage(String),
}

impl EngineError {
    /// 是否屬於呼叫端契約錯誤（輸入無效，而非儲存層故障）
    pub fn is_caller_contract(&self) -> bool {
        !matches!(self, EngineError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
