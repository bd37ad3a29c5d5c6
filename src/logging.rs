//! 日誌系統初始化（tracing + tracing-subscriber）

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// # 環境變數
/// - RUST_LOG: 日誌等級過濾（預設: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=restock_calc=trace
///
/// # 示例
/// ```no_run
/// use restock::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// 初始化測試環境的日誌系統（debug 等級，輸出交給測試框架擷取）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
