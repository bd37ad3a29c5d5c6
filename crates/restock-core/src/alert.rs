//! 警示模型

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::staffing::StaffingSlot;
use crate::units::Unit;

/// 警示類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    /// 缺貨
    Shortage,
    /// 超額庫存
    Overstock,
    /// 人力過剩
    Overstaffing,
    /// 人力不足
    Understaffing,
}

/// 嚴重度（由低到高排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// 是否屬於高風險（high / critical）
    pub fn is_high_risk(&self) -> bool {
        *self >= Severity::High
    }
}

/// 警示對象
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertSubject {
    /// 原料庫存
    Ingredient { ingredient_id: String },
    /// 排班時段
    Slot { date: NaiveDate, slot: StaffingSlot },
}

impl AlertSubject {
    /// 原料ID（非原料對象時為 `None`）
    pub fn ingredient_id(&self) -> Option<&str> {
        match self {
            AlertSubject::Ingredient { ingredient_id } => Some(ingredient_id),
            AlertSubject::Slot { .. } => None,
        }
    }
}

/// 警示自然鍵：(restaurant, subject, type)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlertKey {
    pub restaurant_id: String,
    pub subject: AlertSubject,
    pub alert_type: AlertType,
}

/// 規則評估結果（尚未持久化的警示條件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFinding {
    pub key: AlertKey,
    pub severity: Severity,
    pub message: String,

    /// 觸發缺口：缺貨量、超額量或人數差
    pub quantity_gap: Decimal,

    /// 缺口單位（人力警示時為 `None`）
    pub unit: Option<Unit>,
}

/// 警示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// 警示ID
    pub id: Uuid,

    /// 餐廳ID
    pub restaurant_id: String,

    /// 警示類型
    pub alert_type: AlertType,

    /// 嚴重度
    pub severity: Severity,

    /// 顯示訊息
    pub message: String,

    /// 警示對象
    pub subject: AlertSubject,

    /// 觸發缺口
    pub quantity_gap: Decimal,

    /// 缺口單位
    pub unit: Option<Unit>,

    /// 是否已解除
    pub resolved: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// 由評估結果開立新警示
    pub fn open(finding: AlertFinding, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            restaurant_id: finding.key.restaurant_id,
            alert_type: finding.key.alert_type,
            severity: finding.severity,
            message: finding.message,
            subject: finding.key.subject,
            quantity_gap: finding.quantity_gap,
            unit: finding.unit,
            resolved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// 自然鍵
    pub fn key(&self) -> AlertKey {
        AlertKey {
            restaurant_id: self.restaurant_id.clone(),
            subject: self.subject.clone(),
            alert_type: self.alert_type,
        }
    }

    /// 檢查是否仍未解除
    pub fn is_open(&self) -> bool {
        !self.resolved
    }

    /// 以新的評估結果更新，回傳是否有變更
    pub fn refresh(&mut self, finding: &AlertFinding, now: DateTime<Utc>) -> bool {
        let changed = self.severity != finding.severity
            || self.message != finding.message
            || self.quantity_gap != finding.quantity_gap
            || self.unit != finding.unit;

        if changed {
            self.severity = finding.severity;
            self.message = finding.message.clone();
            self.quantity_gap = finding.quantity_gap;
            self.unit = finding.unit.clone();
            self.updated_at = now;
        }
        changed
    }

    /// 解除警示（狀態翻轉，不刪除歷史）
    pub fn resolve(&mut self, now: DateTime<Utc>) {
        if !self.resolved {
            self.resolved = true;
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortage_finding(gap: i64, severity: Severity) -> AlertFinding {
        AlertFinding {
            key: AlertKey {
                restaurant_id: "R-PARIS".to_string(),
                subject: AlertSubject::Ingredient {
                    ingredient_id: "BEEF".to_string(),
                },
                alert_type: AlertType::Shortage,
            },
            severity,
            message: format!("BEEF short by {gap} kg"),
            quantity_gap: Decimal::from(gap),
            unit: Some(Unit::Kilogram),
        }
    }

    #[test]
    fn test_open_alert() {
        let now = Utc::now();
        let alert = Alert::open(shortage_finding(10, Severity::Critical), now);

        assert!(alert.is_open());
        assert_eq!(alert.alert_type, AlertType::Shortage);
        assert_eq!(alert.subject.ingredient_id(), Some("BEEF"));
        assert_eq!(alert.created_at, now);
    }

    #[test]
    fn test_refresh_only_when_changed() {
        let opened = Utc::now();
        let mut alert = Alert::open(shortage_finding(10, Severity::Critical), opened);

        let later = opened + chrono::Duration::minutes(5);
        assert!(!alert.refresh(&shortage_finding(10, Severity::Critical), later));
        assert_eq!(alert.updated_at, opened);

        assert!(alert.refresh(&shortage_finding(4, Severity::Medium), later));
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.updated_at, later);
    }

    #[test]
    fn test_resolve() {
        let now = Utc::now();
        let mut alert = Alert::open(shortage_finding(10, Severity::High), now);
        alert.resolve(now);

        assert!(!alert.is_open());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High.is_high_risk());
        assert!(!Severity::Medium.is_high_risk());
    }
}
