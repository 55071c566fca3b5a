//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | / | GET | 欢迎信息 |
//! | /health | GET | 简单健康检查 |
//! | /health/detailed | GET | 详细健康检查 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "database": "connected",
//!   "version": "0.1.0"
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::{Instant, SystemTime};

use crate::core::ServerState;

/// 健康检查路由 - 公共路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 欢迎信息
#[derive(Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
    version: &'static str,
}

/// 简单健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy | unhealthy)
    status: &'static str,
    /// 数据库 (connected | disconnected)
    database: &'static str,
    /// 版本号
    version: &'static str,
}

/// 详细健康检查响应
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    timezone: String,
    /// 运行时间 (秒)
    uptime_seconds: u64,
    /// 数据库检查
    database: CheckResult,
}

/// 单项检查结果
#[derive(Serialize)]
pub struct CheckResult {
    /// 状态 (ok | error)
    status: &'static str,
    /// 延迟 (毫秒)
    latency_ms: Option<u64>,
    /// 错误信息
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET / - 欢迎信息
pub async fn welcome() -> Json<WelcomeResponse> {
    // 首次访问时记录启动时间
    START_TIME.get_or_init(SystemTime::now);
    Json(WelcomeResponse {
        message: "Restaurant POS API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health - 基础健康检查 (`SELECT 1`)
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let connected = state.db.ping().await;
    if !connected {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" },
        database: if connected { "connected" } else { "disconnected" },
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/detailed - 包含运行时间和数据库延迟
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let database = if state.db.ping().await {
        CheckResult::ok_with_latency(started.elapsed().as_millis() as u64)
    } else {
        CheckResult::error("SELECT 1 failed")
    };

    let status = if database.status == "ok" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timezone: state.config.timezone.name().to_string(),
        uptime_seconds: get_uptime_seconds(),
        database,
    })
}
