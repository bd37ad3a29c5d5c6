//! 記憶體儲存：`DataSource` / `DataSink` 的參考實作

use chrono::{DateTime, NaiveDate, Utc};
use restock_calc::{DataSink, DataSource};
use restock_core::{
    Alert, EngineError, Ingredient, InventorySnapshot, PlannedStaffing, RecipeLine, Recommendation,
    Restaurant, Result, SalesRecord, StaffingSlot, StockReceipt,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::dirty_tracking::DirtyTracker;

type InventoryKey = (String, String);
type StaffingKey = (String, NaiveDate, StaffingSlot);

#[derive(Debug, Default)]
struct Tables {
    restaurants: BTreeMap<String, Restaurant>,
    sales: Vec<SalesRecord>,
    recipes: Vec<RecipeLine>,
    ingredients: BTreeMap<String, Ingredient>,
    inventory: BTreeMap<InventoryKey, InventorySnapshot>,
    planned: BTreeMap<StaffingKey, PlannedStaffing>,
    alerts: Vec<Alert>,
    recommendations: Vec<Recommendation>,
    dirty: DirtyTracker,
}

/// 記憶體儲存
///
/// 庫存與人力計劃的每次變動都會把餐廳標記為髒。
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    /// 新增或覆寫餐廳
    pub fn add_restaurant(&self, restaurant: Restaurant) -> Result<()> {
        self.write()?
            .restaurants
            .insert(restaurant.id.clone(), restaurant);
        Ok(())
    }

    /// 匯入銷售紀錄
    pub fn add_sales(&self, records: impl IntoIterator<Item = SalesRecord>) -> Result<()> {
        self.write()?.sales.extend(records);
        Ok(())
    }

    /// 新增配方行
    pub fn add_recipe_line(&self, line: RecipeLine) -> Result<()> {
        self.write()?.recipes.push(line);
        Ok(())
    }

    /// 新增或覆寫原料
    pub fn add_ingredient(&self, ingredient: Ingredient) -> Result<()> {
        self.write()?
            .ingredients
            .insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    /// 依 (restaurant, ingredient) upsert 庫存
    pub fn upsert_inventory(&self, snapshot: InventorySnapshot) -> Result<()> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        tables.dirty.mark_dirty(&snapshot.restaurant_id);
        let key = (snapshot.restaurant_id.clone(), snapshot.ingredient_id.clone());
        tables.inventory.insert(key, snapshot);
        Ok(())
    }

    /// 單一原料的庫存快照
    pub fn inventory_of(&self, restaurant_id: &str, ingredient_id: &str) -> Result<Option<InventorySnapshot>> {
        let key = (restaurant_id.to_string(), ingredient_id.to_string());
        Ok(self.read()?.inventory.get(&key).cloned())
    }

    /// 檢查餐廳是否被標記為髒
    pub fn is_dirty(&self, restaurant_id: &str) -> Result<bool> {
        Ok(self.read()?.dirty.is_dirty(restaurant_id))
    }
}

impl DataSource for InMemoryStore {
    fn restaurant(&self, restaurant_id: &str) -> Result<Option<Restaurant>> {
        Ok(self.read()?.restaurants.get(restaurant_id).cloned())
    }

    fn restaurants_in_organization(&self, organization_id: &str) -> Result<Vec<Restaurant>> {
        Ok(self
            .read()?
            .restaurants
            .values()
            .filter(|r| r.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn sales_since(&self, restaurant_id: &str, since: NaiveDate) -> Result<Vec<SalesRecord>> {
        Ok(self
            .read()?
            .sales
            .iter()
            .filter(|s| s.restaurant_id == restaurant_id && s.sale_date >= since)
            .cloned()
            .collect())
    }

    fn recipe_lines(&self) -> Result<Vec<RecipeLine>> {
        Ok(self.read()?.recipes.clone())
    }

    fn ingredients(&self) -> Result<Vec<Ingredient>> {
        Ok(self.read()?.ingredients.values().cloned().collect())
    }

    fn inventory(&self, restaurant_id: &str) -> Result<Vec<InventorySnapshot>> {
        Ok(self
            .read()?
            .inventory
            .values()
            .filter(|s| s.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    fn planned_staffing(&self, restaurant_id: &str) -> Result<Vec<PlannedStaffing>> {
        Ok(self
            .read()?
            .planned
            .values()
            .filter(|p| p.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    fn alerts(&self, restaurant_id: &str) -> Result<Vec<Alert>> {
        Ok(self
            .read()?
            .alerts
            .iter()
            .filter(|a| a.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    fn recommendations(&self, restaurant_id: &str) -> Result<Vec<Recommendation>> {
        Ok(self
            .read()?
            .recommendations
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    fn recommendation(&self, id: Uuid) -> Result<Option<Recommendation>> {
        Ok(self
            .read()?
            .recommendations
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl DataSink for InMemoryStore {
    fn save_recommendation(&self, recommendation: &Recommendation) -> Result<()> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        match tables
            .recommendations
            .iter_mut()
            .find(|r| r.id == recommendation.id)
        {
            Some(existing) => *existing = recommendation.clone(),
            None => tables.recommendations.push(recommendation.clone()),
        }
        Ok(())
    }

    fn upsert_alerts(&self, alerts: &[Alert]) -> Result<()> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        for alert in alerts {
            match tables.alerts.iter_mut().find(|a| a.id == alert.id) {
                Some(existing) => *existing = alert.clone(),
                None => tables.alerts.push(alert.clone()),
            }
        }
        Ok(())
    }

    fn receive_stock(&self, restaurant_id: &str, receipts: &[StockReceipt], at: DateTime<Utc>) -> Result<()> {
        if let Some(bad) = receipts.iter().find(|r| r.quantity < Decimal::ZERO) {
            return Err(EngineError::InvalidQuantity(bad.quantity));
        }

        let mut guard = self.write()?;
        let tables = &mut *guard;
        for receipt in receipts {
            let key = (restaurant_id.to_string(), receipt.ingredient_id.clone());
            match tables.inventory.get_mut(&key) {
                Some(snapshot) => snapshot.receive(receipt.quantity, at)?,
                None => {
                    tracing::debug!("原料 {} 沒有庫存紀錄，入庫時建立", receipt.ingredient_id);
                    let snapshot = InventorySnapshot::new(
                        restaurant_id.to_string(),
                        receipt.ingredient_id.clone(),
                        receipt.quantity,
                        Decimal::ZERO,
                    )
                    .with_last_updated(at);
                    tables.inventory.insert(key, snapshot);
                }
            }
        }
        tables.dirty.mark_dirty(restaurant_id);
        Ok(())
    }

    fn upsert_planned_staffing(&self, rows: &[PlannedStaffing]) -> Result<()> {
        let mut guard = self.write()?;
        let tables = &mut *guard;
        for row in rows {
            tables.dirty.mark_dirty(&row.restaurant_id);
            tables.planned.insert(row.natural_key(), row.clone());
        }
        Ok(())
    }

    fn dirty_restaurants(&self) -> Result<Vec<String>> {
        Ok(self.read()?.dirty.dirty_restaurants())
    }

    fn clear_dirty(&self, restaurant_id: &str) -> Result<()> {
        self.write()?.dirty.clear(restaurant_id);
        Ok(())
    }
}
