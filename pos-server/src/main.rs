use anyhow::Context;
use pos_server::{Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let (config, _log_guard) = setup_environment();

    if !config.is_production() {
        print_banner();
    }

    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        timezone = %config.timezone.name(),
        "POS server starting..."
    );

    // 2. 启动 HTTP 服务器 (Server::run 会初始化数据库并启动后台任务)
    let server = Server::new(config);
    server.run().await.context("server stopped with an error")?;

    Ok(())
}
