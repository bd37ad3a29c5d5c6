//! # Restock Store
//!
//! 持久層邊界的記憶體實作與髒標記追蹤

pub mod dirty_tracking;
pub mod memory;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use memory::InMemoryStore;
