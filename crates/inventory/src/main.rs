/// HyperV Zabbix Tools - Inventory
///
/// 查询 Hyper-V 主机上的虚拟机清单与指标，输出 Zabbix LLD / 依赖监控项可用的 JSON

use clap::error::ErrorKind;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod cli;
mod config;
mod hypervisor;
mod report;
mod storage;

use cli::{Cli, USAGE};
use hypervisor::{PowerShellBackend, PsExecutor};
use report::Reporter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 初始化日志，stdout 只留给 JSON
    tracing_subscriber::fmt()
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level))
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayVersion | ErrorKind::DisplayHelp) => e.exit(),
        Err(_) => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let action = cli.action();
    info!("🚀 hyperv-inventory {} (action: {:?})", cli::VERSION, action);

    let backend = Arc::new(PowerShellBackend::new(PsExecutor::new(&cfg.powershell_bin)));
    let reporter = Reporter::new(backend, &cfg.report_hostname);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::execute(action, &reporter, &mut out).await?;

    Ok(())
}
