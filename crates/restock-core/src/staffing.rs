//! 排班時段與人力計劃模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 固定排班時段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffingSlot {
    /// 00:00 - 11:00
    Morning,
    /// 11:00 - 15:00
    Lunch,
    /// 15:00 - 18:00
    Afternoon,
    /// 18:00 - 24:00
    Evening,
}

impl StaffingSlot {
    /// 所有時段（依時間先後）
    pub const ALL: [StaffingSlot; 4] = [
        StaffingSlot::Morning,
        StaffingSlot::Lunch,
        StaffingSlot::Afternoon,
        StaffingSlot::Evening,
    ];

    /// 由銷售時數對應時段
    pub fn from_hour(hour: u8) -> Option<Self> {
        match hour {
            0..=10 => Some(StaffingSlot::Morning),
            11..=14 => Some(StaffingSlot::Lunch),
            15..=17 => Some(StaffingSlot::Afternoon),
            18..=23 => Some(StaffingSlot::Evening),
            _ => None,
        }
    }

    /// 時段標籤
    pub fn label(&self) -> &'static str {
        match self {
            StaffingSlot::Morning => "morning",
            StaffingSlot::Lunch => "lunch",
            StaffingSlot::Afternoon => "afternoon",
            StaffingSlot::Evening => "evening",
        }
    }

    /// 由標籤解析時段
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|slot| slot.label() == label)
    }

    /// 時段長度（小時）
    pub fn duration_hours(&self) -> u32 {
        match self {
            StaffingSlot::Morning => 11,
            StaffingSlot::Lunch => 4,
            StaffingSlot::Afternoon => 3,
            StaffingSlot::Evening => 6,
        }
    }
}

impl fmt::Display for StaffingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 人力計劃（每個餐廳、日期、時段一筆）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStaffing {
    /// 餐廳ID
    pub restaurant_id: String,

    /// 計劃日期
    pub plan_date: NaiveDate,

    /// 時段
    pub slot: StaffingSlot,

    /// 計劃人數
    pub planned_count: u32,
}

impl PlannedStaffing {
    /// 創建新的人力計劃
    pub fn new(restaurant_id: String, plan_date: NaiveDate, slot: StaffingSlot, planned_count: u32) -> Self {
        Self {
            restaurant_id,
            plan_date,
            slot,
            planned_count,
        }
    }

    /// 自然鍵 (restaurant, date, slot)
    pub fn natural_key(&self) -> (String, NaiveDate, StaffingSlot) {
        (self.restaurant_id.clone(), self.plan_date, self.slot)
    }
}

/// 單一時段的建議人力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStaffing {
    /// 時段
    pub slot: StaffingSlot,

    /// 每日平均銷售量（歷史）
    pub average_volume: Decimal,

    /// 建議人數
    pub recommended_count: u32,

    /// 目前計劃人數（無計劃時為 `None`）
    pub planned_count: Option<u32>,
}

impl SlotStaffing {
    /// 建議人數與計劃人數之差（正值表示需增加人力）
    pub fn delta(&self) -> i64 {
        i64::from(self.recommended_count) - i64::from(self.planned_count.unwrap_or(0))
    }
}
