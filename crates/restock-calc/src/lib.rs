//! # Restock Calculation Engine
//!
//! 補貨建議、排班建議、警示評估與管理層指標的計算引擎

pub mod alerts;
pub mod bom;
pub mod demand;
pub mod engine;
pub mod impact;
pub mod metrics;
pub mod ordering;
pub mod source;
pub mod staffing;

// Re-export 主要類型
pub use alerts::{reconcile, AlertEvaluation, AlertRuleEngine, Reconciliation};
pub use bom::{BomExploder, BomExplosion};
pub use demand::{DemandAggregator, ProductDemand};
pub use engine::{DirtyEvaluation, NoRecommendation, RecommendationOutcome, RestockEngine};
pub use impact::{Estimate, ImpactBasis, ImpactEstimator};
pub use metrics::{MetricsInput, MetricsRollup, MetricsSummary, ReportingPeriod};
pub use ordering::{OrderPlan, OrderQuantity, OrderQuantityCalculator};
pub use source::{DataSink, DataSource};
pub use staffing::{StaffingOutcome, StaffingPlan, StaffingRecommender};
