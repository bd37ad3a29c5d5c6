//! 銷售紀錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::staffing::StaffingSlot;

/// 銷售紀錄（POS 匯入的歷史事實，唯讀）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 餐廳ID
    pub restaurant_id: String,

    /// 產品ID
    pub product_id: String,

    /// 銷售數量
    pub quantity_sold: Decimal,

    /// 銷售金額
    pub amount: Decimal,

    /// 銷售日期
    pub sale_date: NaiveDate,

    /// 銷售時段（0-23 時）
    pub sale_hour: u8,
}

impl SalesRecord {
    /// 創建新的銷售紀錄
    pub fn new(
        restaurant_id: String,
        product_id: String,
        quantity_sold: Decimal,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            restaurant_id,
            product_id,
            quantity_sold,
            amount: Decimal::ZERO,
            sale_date,
            sale_hour: 12,
        }
    }

    /// 建構器模式：設置銷售金額
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// 建構器模式：設置銷售時段
    pub fn with_sale_hour(mut self, sale_hour: u8) -> Self {
        self.sale_hour = sale_hour;
        self
    }

    /// 檢查是否落在 `[since, until]` 區間內
    pub fn is_within(&self, since: NaiveDate, until: NaiveDate) -> bool {
        self.sale_date >= since && self.sale_date <= until
    }

    /// 對應的排班時段（時數無效時為 `None`）
    pub fn slot(&self) -> Option<StaffingSlot> {
        StaffingSlot::from_hour(self.sale_hour)
    }
}
