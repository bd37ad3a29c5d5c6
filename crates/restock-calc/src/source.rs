//! 持久層邊界
//!
//! 引擎只透過這兩個 trait 讀寫資料；所有 I/O 都發生在純計算之前或之後。

use chrono::{DateTime, NaiveDate, Utc};
use restock_core::{
    Alert, Ingredient, InventorySnapshot, PlannedStaffing, RecipeLine, Recommendation, Restaurant,
    Result, SalesRecord, StockReceipt,
};
use uuid::Uuid;

/// 讀取端
pub trait DataSource: Send + Sync {
    /// 依ID查詢餐廳
    fn restaurant(&self, restaurant_id: &str) -> Result<Option<Restaurant>>;

    /// 組織下所有餐廳
    fn restaurants_in_organization(&self, organization_id: &str) -> Result<Vec<Restaurant>>;

    /// 餐廳自 `since`（含）起的銷售紀錄
    fn sales_since(&self, restaurant_id: &str, since: NaiveDate) -> Result<Vec<SalesRecord>>;

    /// 所有配方行
    fn recipe_lines(&self) -> Result<Vec<RecipeLine>>;

    /// 原料目錄
    fn ingredients(&self) -> Result<Vec<Ingredient>>;

    /// 餐廳庫存快照
    fn inventory(&self, restaurant_id: &str) -> Result<Vec<InventorySnapshot>>;

    /// 餐廳人力計劃
    fn planned_staffing(&self, restaurant_id: &str) -> Result<Vec<PlannedStaffing>>;

    /// 餐廳所有警示（含已解除）
    fn alerts(&self, restaurant_id: &str) -> Result<Vec<Alert>>;

    /// 餐廳所有建議
    fn recommendations(&self, restaurant_id: &str) -> Result<Vec<Recommendation>>;

    /// 依ID查詢建議
    fn recommendation(&self, id: Uuid) -> Result<Option<Recommendation>>;
}

/// 寫入端
pub trait DataSink: Send + Sync {
    /// 新增或更新建議（以ID為鍵）
    fn save_recommendation(&self, recommendation: &Recommendation) -> Result<()>;

    /// 新增或更新警示（以ID為鍵）
    fn upsert_alerts(&self, alerts: &[Alert]) -> Result<()>;

    /// 入庫：依原料增加庫存
    fn receive_stock(
        &self,
        restaurant_id: &str,
        receipts: &[StockReceipt],
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// 依 (restaurant, date, slot) upsert 人力計劃
    fn upsert_planned_staffing(&self, rows: &[PlannedStaffing]) -> Result<()>;

    /// 需要重新評估警示的餐廳（只列出，不清除）
    fn dirty_restaurants(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// 清除單一餐廳的髒標記（警示已重新評估）
    fn clear_dirty(&self, _restaurant_id: &str) -> Result<()> {
        Ok(())
    }
}
