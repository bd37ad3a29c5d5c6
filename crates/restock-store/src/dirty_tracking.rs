//! 髒標記追蹤：記錄庫存或人力計劃有變動、需要重新評估警示的餐廳

use std::collections::BTreeSet;

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_restaurants: BTreeSet<String>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記餐廳為髒
    pub fn mark_dirty(&mut self, restaurant_id: &str) {
        if self.dirty_restaurants.insert(restaurant_id.to_string()) {
            tracing::debug!("餐廳 {} 標記為髒", restaurant_id);
        }
    }

    /// 檢查餐廳是否為髒
    pub fn is_dirty(&self, restaurant_id: &str) -> bool {
        self.dirty_restaurants.contains(restaurant_id)
    }

    /// 清除單一餐廳的髒標記
    pub fn clear(&mut self, restaurant_id: &str) {
        self.dirty_restaurants.remove(restaurant_id);
    }

    /// 所有髒餐廳（依ID排序），不清除標記
    pub fn dirty_restaurants(&self) -> Vec<String> {
        self.dirty_restaurants.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.dirty_restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_restaurants.is_empty()
    }
}
