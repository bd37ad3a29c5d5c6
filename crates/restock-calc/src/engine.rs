//! 引擎呼叫介面
//!
//! 每個公開方法：邊界讀取 → 純計算 → 邊界寫入。引擎本身不持有可變狀態。

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rayon::prelude::*;
use restock_core::{
    Alert, DataGap, EngineConfig, EngineError, Ingredient, InventorySnapshot, NoRecommendationReason,
    OrderRecommendationData, PlannedStaffing, Recommendation, RecommendationData, Restaurant,
    Result, WriteBack,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

use crate::alerts::{reconcile, AlertRuleEngine};
use crate::bom::BomExploder;
use crate::demand::DemandAggregator;
use crate::metrics::{MetricsInput, MetricsRollup, MetricsSummary};
use crate::ordering::OrderQuantityCalculator;
use crate::source::{DataSink, DataSource};
use crate::staffing::{StaffingOutcome, StaffingRecommender};

type RestaurantSnapshot = (Vec<Recommendation>, Vec<Alert>, Vec<InventorySnapshot>);

/// 未產生建議
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoRecommendation {
    pub restaurant_id: String,
    pub reason: NoRecommendationReason,

    /// 計算過程中收集的資料缺口
    pub data_gaps: Vec<DataGap>,
}

impl NoRecommendation {
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

/// 建議產生結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecommendationOutcome {
    Generated(Recommendation),
    NotGenerated(NoRecommendation),
}

impl RecommendationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, RecommendationOutcome::Generated(_))
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            RecommendationOutcome::Generated(recommendation) => Some(recommendation),
            RecommendationOutcome::NotGenerated(_) => None,
        }
    }

    pub fn reason(&self) -> Option<NoRecommendationReason> {
        match self {
            RecommendationOutcome::Generated(_) => None,
            RecommendationOutcome::NotGenerated(none) => Some(none.reason),
        }
    }
}

/// 髒餐廳批次評估結果
#[derive(Debug, Default)]
pub struct DirtyEvaluation {
    /// 評估成功的餐廳及其未解除警示
    pub evaluated: BTreeMap<String, Vec<Alert>>,

    /// 評估失敗的餐廳（髒標記仍保留）
    pub failed: BTreeMap<String, EngineError>,
}

impl DirtyEvaluation {
    pub fn is_empty(&self) -> bool {
        self.evaluated.is_empty() && self.failed.is_empty()
    }
}

/// 補貨與警示引擎
pub struct RestockEngine<S> {
    store: S,
    config: EngineConfig,
    fixed_now: Option<DateTime<Utc>>,
}

impl<S: DataSource + DataSink> RestockEngine<S> {
    /// 創建引擎（配置不合理時回傳錯誤）
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            fixed_now: None,
        })
    }

    /// 固定「現在」時間（報表期間、回溯期間都以此為準）
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// 產生訂貨建議
    ///
    /// `shrink_pct` 為 `None` 時使用配置的預設值；`window_days <= 0` 直接拒絕。
    pub fn generate_order_recommendation(
        &self,
        restaurant_id: &str,
        shrink_pct: Option<Decimal>,
        window_days: i64,
    ) -> Result<RecommendationOutcome> {
        if window_days <= 0 {
            return Err(EngineError::InvalidWindow(window_days));
        }
        let shrink_pct = shrink_pct.unwrap_or(self.config.default_shrink_pct);
        if shrink_pct < Decimal::ZERO {
            return Err(EngineError::InvalidShrink(shrink_pct));
        }
        let restaurant = self.require_restaurant(restaurant_id)?;

        let max_window = i64::from(self.config.max_window_days);
        let window_days = if window_days > max_window {
            tracing::warn!("回溯天數 {} 超過上限，截斷為 {}", window_days, max_window);
            max_window
        } else {
            window_days
        };

        tracing::info!(
            "開始產生訂貨建議: 餐廳 {}，回溯 {} 天，耗損 {}",
            restaurant.id,
            window_days,
            shrink_pct
        );
        let start_time = std::time::Instant::now();
        let as_of = self.now().date_naive();

        tracing::debug!("Step 1: 需求彙總");
        let since = as_of - Duration::days(window_days);
        let sales = self.store.sales_since(&restaurant.id, since)?;
        let demand = DemandAggregator::aggregate(&sales, window_days, as_of);
        if demand.is_empty() {
            return Ok(self.not_generated(&restaurant.id, NoRecommendationReason::NoRecentSales, Vec::new()));
        }

        let horizon = self.config.forecast_horizon_days;
        let horizon_demand: BTreeMap<String, Decimal> = demand
            .iter()
            .map(|(product_id, d)| (product_id.clone(), d.for_horizon(horizon)))
            .collect();

        tracing::debug!("Step 2: BOM 展開");
        let recipes = self.store.recipe_lines()?;
        let ingredients = self.ingredient_map()?;
        let explosion = BomExploder::explode(&horizon_demand, &recipes, &ingredients);
        let mut gaps = explosion.gaps;
        if explosion.needs.is_empty() {
            return Ok(self.not_generated(
                &restaurant.id,
                NoRecommendationReason::NoRecipesWithRecentSales,
                gaps,
            ));
        }

        tracing::debug!("Step 3: 訂購量計算");
        let inventory: HashMap<String, InventorySnapshot> = self
            .store
            .inventory(&restaurant.id)?
            .into_iter()
            .map(|s| (s.ingredient_id.clone(), s))
            .collect();
        let plan = OrderQuantityCalculator::plan(&explosion.needs, shrink_pct, &inventory, &ingredients);
        gaps.extend(plan.gaps);

        if plan.lines.is_empty() {
            return Ok(self.not_generated(
                &restaurant.id,
                NoRecommendationReason::StockAlreadySufficient,
                gaps,
            ));
        }
        if !gaps.is_empty() {
            tracing::warn!("餐廳 {} 的訂貨建議有 {} 個資料缺口", restaurant.id, gaps.len());
        }

        let data = OrderRecommendationData {
            shrink_pct,
            window_days: u32::try_from(window_days).unwrap_or(u32::MAX),
            horizon_days: horizon,
            lines: plan.lines,
            overstocked: plan.overstocked,
            estimated_order_cost: plan.estimated_order_cost,
            estimated_savings: plan.estimated_savings,
            data_gaps: gaps,
        };
        let recommendation = Recommendation::new(
            restaurant.id.clone(),
            RecommendationData::Order(data),
            plan.priority,
            self.now(),
        );
        self.store.save_recommendation(&recommendation)?;

        tracing::info!("訂貨建議完成，耗時 {:?}", start_time.elapsed());
        tracing::info!("建議 {} 優先級 {:?}", recommendation.id, recommendation.priority);

        Ok(RecommendationOutcome::Generated(recommendation))
    }

    /// 產生排班建議
    pub fn generate_staffing_recommendation(
        &self,
        restaurant_id: &str,
        target_date: NaiveDate,
    ) -> Result<RecommendationOutcome> {
        let restaurant = self.require_restaurant(restaurant_id)?;
        tracing::info!("開始產生排班建議: 餐廳 {}，日期 {}", restaurant.id, target_date);
        let start_time = std::time::Instant::now();

        let since = target_date - Duration::days(i64::from(self.config.staffing.history_days));
        let sales = self.store.sales_since(&restaurant.id, since)?;
        let planned = self.store.planned_staffing(&restaurant.id)?;

        let plan = match StaffingRecommender::recommend(&sales, target_date, &planned, &self.config.staffing) {
            StaffingOutcome::Recommended(plan) => plan,
            StaffingOutcome::NoHistory(gaps) => {
                return Ok(self.not_generated(&restaurant.id, NoRecommendationReason::NoStaffingHistory, gaps));
            }
        };

        let recommendation = Recommendation::new(
            restaurant.id.clone(),
            RecommendationData::Staffing(plan.data),
            plan.priority,
            self.now(),
        );
        self.store.save_recommendation(&recommendation)?;

        tracing::info!("排班建議完成，耗時 {:?}", start_time.elapsed());
        Ok(RecommendationOutcome::Generated(recommendation))
    }

    /// 重新評估餐廳警示，回傳目前未解除的警示
    ///
    /// 同一家餐廳的呼叫必須由呼叫端序列化。
    pub fn evaluate_alerts(&self, restaurant_id: &str) -> Result<Vec<Alert>> {
        let restaurant = self.require_restaurant(restaurant_id)?;
        let start_time = std::time::Instant::now();
        let now = self.now();

        let inventory = self.store.inventory(&restaurant.id)?;
        let planned = self.store.planned_staffing(&restaurant.id)?;
        let ingredients = self.ingredient_map()?;
        let recommended = self.recommended_staffing(&restaurant.id, &planned, now.date_naive())?;

        let evaluation = AlertRuleEngine::evaluate(
            &inventory,
            &planned,
            &recommended,
            &ingredients,
            &self.config.staffing,
        );

        let existing = self.store.alerts(&restaurant.id)?;
        let reconciliation = reconcile(existing, &evaluation, now);
        if !reconciliation.changed.is_empty() {
            self.store.upsert_alerts(&reconciliation.changed)?;
        }
        self.store.clear_dirty(&restaurant.id)?;

        let open = reconciliation.open_alerts();
        tracing::info!(
            "餐廳 {} 警示評估完成，耗時 {:?}：未解除 {}（新增 {}，解除 {}）",
            restaurant.id,
            start_time.elapsed(),
            open.len(),
            reconciliation.created,
            reconciliation.resolved
        );
        Ok(open)
    }

    /// 重新評估所有被標記為髒的餐廳
    ///
    /// 標記由 [`Self::evaluate_alerts`] 在成功後逐一清除；失敗的餐廳保留標記，
    /// 下次呼叫會再評估。
    pub fn evaluate_dirty(&self) -> Result<DirtyEvaluation> {
        let dirty: BTreeSet<String> = self.store.dirty_restaurants()?.into_iter().collect();
        tracing::debug!("需要重新評估的餐廳: {:?}", dirty);

        let mut result = DirtyEvaluation::default();
        for restaurant_id in dirty {
            match self.evaluate_alerts(&restaurant_id) {
                Ok(open) => {
                    result.evaluated.insert(restaurant_id, open);
                }
                Err(e) => {
                    tracing::warn!("餐廳 {} 警示評估失敗，保留髒標記: {}", restaurant_id, e);
                    result.failed.insert(restaurant_id, e);
                }
            }
        }
        Ok(result)
    }

    /// 接受建議：回寫庫存或人力計劃，並重新評估警示
    pub fn accept_recommendation(&self, id: Uuid) -> Result<Recommendation> {
        let mut recommendation = self.require_recommendation(id)?;
        let now = self.now();

        let write_back = recommendation.accept(now)?;
        match &write_back {
            WriteBack::InventoryReceipt {
                restaurant_id,
                receipts,
            } => self.store.receive_stock(restaurant_id, receipts, now)?,
            WriteBack::StaffingPlan(rows) => self.store.upsert_planned_staffing(rows)?,
        }
        self.store.save_recommendation(&recommendation)?;
        tracing::info!("建議 {} 已接受", recommendation.id);

        self.evaluate_alerts(&recommendation.restaurant_id)?;
        Ok(recommendation)
    }

    /// 忽略建議
    pub fn dismiss_recommendation(&self, id: Uuid) -> Result<Recommendation> {
        let mut recommendation = self.require_recommendation(id)?;
        recommendation.dismiss(self.now())?;
        self.store.save_recommendation(&recommendation)?;
        tracing::info!("建議 {} 已忽略", recommendation.id);
        Ok(recommendation)
    }

    /// 計算管理層指標（單一餐廳或整個組織）
    pub fn compute_executive_metrics(
        &self,
        organization_id: &str,
        restaurant_id: Option<&str>,
    ) -> Result<MetricsSummary> {
        let restaurants = match restaurant_id {
            Some(id) => {
                let restaurant = self.require_restaurant(id)?;
                if restaurant.organization_id != organization_id {
                    return Err(EngineError::RestaurantOutsideOrganization {
                        restaurant_id: restaurant.id,
                        organization_id: organization_id.to_string(),
                    });
                }
                vec![restaurant]
            }
            None => self.store.restaurants_in_organization(organization_id)?,
        };

        tracing::info!("計算管理層指標: 組織 {}，{} 家餐廳", organization_id, restaurants.len());
        let start_time = std::time::Instant::now();

        // 各餐廳之間沒有互動，可平行讀取
        let loaded = restaurants
            .par_iter()
            .map(|r| -> Result<RestaurantSnapshot> {
                Ok((
                    self.store.recommendations(&r.id)?,
                    self.store.alerts(&r.id)?,
                    self.store.inventory(&r.id)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut recommendations = Vec::new();
        let mut alerts = Vec::new();
        let mut inventory = Vec::new();
        for (r, a, i) in loaded {
            recommendations.extend(r);
            alerts.extend(a);
            inventory.extend(i);
        }
        let ingredients = self.ingredient_map()?;

        let summary = MetricsRollup::summarize(
            organization_id,
            restaurant_id,
            MetricsInput {
                recommendations: &recommendations,
                alerts: &alerts,
                inventory: &inventory,
                ingredients: &ingredients,
            },
            self.now(),
            &self.config,
        );

        tracing::info!("指標計算完成，耗時 {:?}", start_time.elapsed());
        Ok(summary)
    }

    fn require_restaurant(&self, restaurant_id: &str) -> Result<Restaurant> {
        self.store
            .restaurant(restaurant_id)?
            .ok_or_else(|| EngineError::UnknownRestaurant(restaurant_id.to_string()))
    }

    fn require_recommendation(&self, id: Uuid) -> Result<Recommendation> {
        self.store
            .recommendation(id)?
            .ok_or(EngineError::RecommendationNotFound(id))
    }

    fn ingredient_map(&self) -> Result<HashMap<String, Ingredient>> {
        Ok(self
            .store
            .ingredients()?
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect())
    }

    /// 今天（含）之後每個有人力計劃的日期，計算建議人數
    fn recommended_staffing(
        &self,
        restaurant_id: &str,
        planned: &[PlannedStaffing],
        today: NaiveDate,
    ) -> Result<Vec<PlannedStaffing>> {
        let dates: BTreeSet<NaiveDate> = planned
            .iter()
            .map(|p| p.plan_date)
            .filter(|d| *d >= today)
            .collect();
        let Some(earliest) = dates.first().copied() else {
            return Ok(Vec::new());
        };

        let since = earliest - Duration::days(i64::from(self.config.staffing.history_days));
        let sales = self.store.sales_since(restaurant_id, since)?;

        let mut rows = Vec::new();
        for date in dates {
            if let StaffingOutcome::Recommended(plan) =
                StaffingRecommender::recommend(&sales, date, planned, &self.config.staffing)
            {
                rows.extend(plan.as_planned_rows(restaurant_id));
            }
        }
        Ok(rows)
    }

    fn not_generated(
        &self,
        restaurant_id: &str,
        reason: NoRecommendationReason,
        data_gaps: Vec<DataGap>,
    ) -> RecommendationOutcome {
        tracing::info!("餐廳 {} 未產生建議: {}", restaurant_id, reason);
        RecommendationOutcome::NotGenerated(NoRecommendation {
            restaurant_id: restaurant_id.to_string(),
            reason,
            data_gaps,
        })
    }
}
