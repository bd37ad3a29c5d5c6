//! # Restock
//!
//! 多餐廳營運平台的補貨建議與營運警示引擎
//!
//! - [`restock_core`]：資料模型、單位換算、配置與錯誤類型
//! - [`restock_calc`]：需求彙總、BOM 展開、訂購量、警示、排班、財務影響與指標
//! - [`restock_store`]：持久層邊界的記憶體實作

pub mod logging;

pub use restock_calc;
pub use restock_core;
pub use restock_store;

pub use restock_calc::{
    DataSink, DataSource, DirtyEvaluation, Estimate, ImpactBasis, MetricsSummary, NoRecommendation,
    RecommendationOutcome, RestockEngine,
};
pub use restock_core::{EngineConfig, EngineError, Result};
pub use restock_store::InMemoryStore;

/// 以記憶體儲存建立引擎
pub fn in_memory_engine(config: EngineConfig) -> Result<RestockEngine<InMemoryStore>> {
    RestockEngine::new(InMemoryStore::new(), config)
}
