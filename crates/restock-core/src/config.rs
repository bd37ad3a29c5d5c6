//! 引擎配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::staffing::StaffingSlot;
use crate::{EngineError, Result};

/// 引擎配置
///
/// 所有欄位都有預設值，JSON 只需提供要覆寫的欄位。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 預設耗損緩衝比例（呼叫端未指定時使用）
    pub default_shrink_pct: Decimal,

    /// 預測天數
    pub forecast_horizon_days: u32,

    /// 最大回溯天數（超過時截斷）
    pub max_window_days: u32,

    /// 排班參數
    pub staffing: StaffingConfig,

    /// 啟發式成本（缺少結構化成本資料時使用）
    pub heuristics: HeuristicCosts,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_shrink_pct: Decimal::new(10, 2),
            forecast_horizon_days: 7,
            max_window_days: 365,
            staffing: StaffingConfig::default(),
            heuristics: HeuristicCosts::default(),
        }
    }
}

impl EngineConfig {
    /// 從 JSON 字串載入（未提供的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置預設耗損緩衝
    pub fn with_default_shrink_pct(mut self, shrink_pct: Decimal) -> Self {
        self.default_shrink_pct = shrink_pct;
        self
    }

    /// 建構器模式：設置預測天數
    pub fn with_forecast_horizon_days(mut self, days: u32) -> Self {
        self.forecast_horizon_days = days;
        self
    }

    /// 建構器模式：設置最大回溯天數
    pub fn with_max_window_days(mut self, days: u32) -> Self {
        self.max_window_days = days;
        self
    }

    /// 建構器模式：設置排班參數
    pub fn with_staffing(mut self, staffing: StaffingConfig) -> Self {
        self.staffing = staffing;
        self
    }

    /// 建構器模式：設置啟發式成本
    pub fn with_heuristics(mut self, heuristics: HeuristicCosts) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// 檢查配置是否合理
    pub fn validate(&self) -> Result<()> {
        if self.default_shrink_pct < Decimal::ZERO {
            return Err(EngineError::InvalidShrink(self.default_shrink_pct));
        }
        if self.forecast_horizon_days == 0 {
            return Err(EngineError::InvalidConfig(
                "forecast_horizon_days must be at least 1".to_string(),
            ));
        }
        if self.max_window_days == 0 {
            return Err(EngineError::InvalidConfig(
                "max_window_days must be at least 1".to_string(),
            ));
        }
        self.staffing.validate()
    }
}

/// 排班參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingConfig {
    /// 歷史回溯天數
    pub history_days: u32,

    /// 每名員工每時段可處理的銷售量
    pub units_per_staff: Decimal,

    /// 計劃人數超過建議人數此倍數時視為人力過剩
    pub overstaffing_ratio: Decimal,

    /// 計劃人數低於建議人數此倍數時視為人力不足
    pub understaffing_ratio: Decimal,

    /// 每人每小時成本
    pub hourly_cost: Decimal,

    /// 各時段人數上下限
    pub slot_bounds: SlotBoundsTable,
}

impl Default for StaffingConfig {
    fn default() -> Self {
        Self {
            history_days: 28,
            units_per_staff: Decimal::from(20),
            overstaffing_ratio: Decimal::new(13, 1),
            understaffing_ratio: Decimal::new(7, 1),
            hourly_cost: Decimal::from(15),
            slot_bounds: SlotBoundsTable::default(),
        }
    }
}

impl StaffingConfig {
    /// 檢查排班參數
    pub fn validate(&self) -> Result<()> {
        if self.history_days == 0 {
            return Err(EngineError::InvalidConfig(
                "staffing.history_days must be at least 1".to_string(),
            ));
        }
        if self.units_per_staff <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig(
                "staffing.units_per_staff must be positive".to_string(),
            ));
        }
        if self.understaffing_ratio > self.overstaffing_ratio {
            return Err(EngineError::InvalidConfig(
                "staffing.understaffing_ratio must not exceed overstaffing_ratio".to_string(),
            ));
        }
        for slot in StaffingSlot::ALL {
            let bounds = self.slot_bounds.bounds(slot);
            if bounds.min > bounds.max {
                return Err(EngineError::InvalidConfig(format!(
                    "staffing bounds for {slot}: min {} > max {}",
                    bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }
}

/// 人數上下限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffBounds {
    pub min: u32,
    pub max: u32,
}

impl StaffBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// 將人數限制在上下限內
    pub fn clamp(&self, count: u32) -> u32 {
        count.clamp(self.min, self.max.max(self.min))
    }
}

/// 各時段人數上下限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotBoundsTable {
    pub morning: StaffBounds,
    pub lunch: StaffBounds,
    pub afternoon: StaffBounds,
    pub evening: StaffBounds,
}

impl Default for SlotBoundsTable {
    fn default() -> Self {
        Self {
            morning: StaffBounds::new(1, 3),
            lunch: StaffBounds::new(2, 8),
            afternoon: StaffBounds::new(1, 4),
            evening: StaffBounds::new(2, 8),
        }
    }
}

impl SlotBoundsTable {
    /// 取得時段上下限
    pub fn bounds(&self, slot: StaffingSlot) -> StaffBounds {
        match slot {
            StaffingSlot::Morning => self.morning,
            StaffingSlot::Lunch => self.lunch,
            StaffingSlot::Afternoon => self.afternoon,
            StaffingSlot::Evening => self.evening,
        }
    }

    /// 建構器模式：設置時段上下限
    pub fn with_bounds(mut self, slot: StaffingSlot, bounds: StaffBounds) -> Self {
        match slot {
            StaffingSlot::Morning => self.morning = bounds,
            StaffingSlot::Lunch => self.lunch = bounds,
            StaffingSlot::Afternoon => self.afternoon = bounds,
            StaffingSlot::Evening => self.evening = bounds,
        }
        self
    }
}

/// 啟發式成本（€）
///
/// 屬於業務調校參數，只在結構化成本資料不可用時使用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicCosts {
    /// 每筆缺貨警示
    pub shortage_alert: Decimal,

    /// 每筆超額庫存警示
    pub overstock_alert: Decimal,

    /// 每筆人力警示
    pub staffing_alert: Decimal,

    /// 每筆已接受建議的節省
    pub accepted_recommendation: Decimal,

    /// 每筆超額庫存警示的浪費
    pub waste_per_overstock_alert: Decimal,
}

impl Default for HeuristicCosts {
    fn default() -> Self {
        Self {
            shortage_alert: Decimal::from(150),
            overstock_alert: Decimal::from(80),
            staffing_alert: Decimal::from(120),
            accepted_recommendation: Decimal::from(500),
            waste_per_overstock_alert: Decimal::from(50),
        }
    }
}
