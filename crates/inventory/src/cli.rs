/// 命令行
///
/// 只接受一个位置参数 `lld` 或 `full`；缺失或未知时把用法打印到 stdout

use clap::Parser;
use common::Result;
use std::io::Write;

use crate::report::{Action, Reporter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "用法: hyperv-inventory <lld|full>";

#[derive(Debug, Parser)]
#[command(name = "hyperv-inventory", version = VERSION, about = "Hyper-V 虚拟机清单与指标，输出 Zabbix 可用的 JSON")]
pub struct Cli {
    /// lld: 低级发现数据；full: 全量指标
    pub action: Option<String>,
}

impl Cli {
    pub fn action(&self) -> Option<Action> {
        self.action.as_deref().and_then(|a| a.parse().ok())
    }
}

/// 执行一次报告，结果写入 `out`
pub async fn execute<W: Write>(action: Option<Action>, reporter: &Reporter, out: &mut W) -> Result<()> {
    match action {
        Some(action) => {
            let json = reporter.render(action).await?;
            writeln!(out, "{}", json)?;
        }
        None => {
            writeln!(out, "{}", USAGE)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypervisor::fake::FakeBackend;
    use common::VirtualMachine;
    use std::sync::Arc;

    fn reporter() -> Reporter {
        let backend = FakeBackend {
            vms: vec![VirtualMachine {
                name: "web01".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        Reporter::new(Arc::new(backend), "HV01")
    }

    #[test]
    fn test_parse_action() {
        let cli = Cli::try_parse_from(["hyperv-inventory", "lld"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Lld));

        let cli = Cli::try_parse_from(["hyperv-inventory", "full"]).unwrap();
        assert_eq!(cli.action(), Some(Action::Full));

        let cli = Cli::try_parse_from(["hyperv-inventory", "bogus"]).unwrap();
        assert_eq!(cli.action(), None);

        let cli = Cli::try_parse_from(["hyperv-inventory"]).unwrap();
        assert_eq!(cli.action(), None);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["hyperv-inventory", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[tokio::test]
    async fn test_unknown_action_prints_usage_only() {
        let mut out = Vec::new();
        execute(None, &reporter(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("{}\n", USAGE));
        assert!(!text.contains('{'));
    }

    #[tokio::test]
    async fn test_lld_writes_json_line() {
        let mut out = Vec::new();
        execute(Some(Action::Lld), &reporter(), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["data"][0]["{#VM.NAME}"], "web01");
    }
}
