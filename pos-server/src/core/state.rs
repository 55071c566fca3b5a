use std::time::Duration;

use axum::body::Body;
use http::{Request, Response};
use sqlx::SqlitePool;
use tower::Service;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::db::DbService;

/// Result type for in-process router calls
pub type OneshotResult = anyhow::Result<Response<Body>>;

/// 服务器状态 - 所有 handler 共享
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
///
/// 连接池内部是 `Arc`，克隆成本很低。
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
}

impl ServerState {
    /// 初始化服务器状态：创建工作目录、打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_db(config.clone(), db))
    }

    /// 使用现有数据库创建状态 (测试使用内存数据库)
    pub fn with_db(config: Config, db: DbService) -> Self {
        Self { config, db }
    }

    /// 数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 启动后台任务 (预热 + 库存 / 出餐监控)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let pool = self.db.pool.clone();
        tasks.spawn("sqlite_optimize", TaskKind::Warmup, async move {
            if let Err(e) = sqlx::query("PRAGMA optimize").execute(&pool).await {
                tracing::warn!(error = %e, "PRAGMA optimize failed");
            }
        });

        crate::monitors::register(&mut tasks, &self.db.pool, &self.config);
        tasks.log_summary();
        tasks
    }

    /// 关闭超时
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.config.shutdown_timeout_ms)
    }

    /// 不经过网络直接调用完整的应用 (含中间件)
    ///
    /// ```ignore
    /// let request = Request::builder().uri("/health").body(Body::empty())?;
    /// let response = state.oneshot(request).await?;
    /// ```
    pub async fn oneshot(&self, request: Request<Body>) -> OneshotResult {
        let mut svc = crate::routes::build_app().with_state(self.clone());
        let response = svc.call(request).await?;
        Ok(response)
    }
}
