/// HyperV Zabbix Tools - Agent 配置工具
///
/// 交互式获取 Zabbix Server、ServerActive、Hostname，写入 Agent 配置文件并重启服务

use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

mod config;
mod prompt;
mod reconcile;
mod service;
mod setup;
mod store;

use prompt::Prompter;
use reconcile::ConfigEntry;
use service::{ServiceControl, SystemdService};
use setup::AgentSetup;
use store::FileConfigStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 初始化日志，输出到 stderr，RUST_LOG 优先
    tracing_subscriber::fmt()
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level))
        )
        .init();

    info!("🚀 Zabbix Agent 配置工具启动");

    let mut prompter = Prompter::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    let server = prompter
        .ask("Zabbix Server", cfg.default_server.as_deref())
        .await?;
    let server_active = prompter
        .ask("Zabbix ServerActive", cfg.default_server_active.as_deref())
        .await?;
    let hostname = prompter
        .ask("Hostname", cfg.default_hostname.as_deref())
        .await?;

    let entries = vec![
        ConfigEntry::new("Server", server),
        ConfigEntry::new("ServerActive", server_active),
        ConfigEntry::new("Hostname", hostname),
    ];

    let store = Arc::new(FileConfigStore::new(&cfg.agent_conf));
    let service = Arc::new(SystemdService::new(&cfg.agent_service));
    info!("📌 配置文件: {}, 服务: {}", cfg.agent_conf, service.name());

    let setup = AgentSetup::new(store, service);
    let outcomes = setup.apply(&entries).await?;

    let changed = outcomes.iter().filter(|(_, o)| o.is_change()).count();
    for (key, outcome) in &outcomes {
        info!("{}: {:?}", key, outcome);
    }
    info!("✅ 完成，{} 项配置发生变化", changed);

    Ok(())
}
