//! Restaurant POS Server - 餐厅后台服务
//!
//! # 架构概述
//!
//! 单机 HTTP 服务，SQLite 存储，提供以下核心功能：
//!
//! - **订单** (`orders`, `api/orders`): 下单时按配方原子地核对并扣减库存
//! - **库存** (`api/inventory`, `api/recipes`, `api/stock_presets`)
//! - **桌台与预订** (`api/tables`, `api/customers`, `api/reservations`)
//! - **报表** (`reports`): 销售汇总、商品分析、按小时销售、出餐效率
//! - **监控** (`monitors`): 低库存与出餐延迟的后台巡检
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由汇总与中间件
//! ├── middleware/    # 请求日志
//! ├── db/            # 连接池、迁移、repository
//! ├── orders/        # 状态流转、库存计算
//! ├── reports/       # 报表聚合
//! ├── monitors/      # 定时巡检
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod monitors;
pub mod orders;
pub mod reports;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置环境：加载 `.env`、读取配置、初始化日志
///
/// 返回的 guard 需要在进程生命周期内保持存活 (文件日志)。
pub fn setup_environment() -> (Config, Option<tracing_appender::non_blocking::WorkerGuard>) {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    let guard = init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    (config, guard)
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
