use anyhow::Result;
use email_triage_submit::orchestrator::App;
use email_triage_submit::utils::logging;
use email_triage_submit::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load();

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
