/// 服务控制
///
/// 配置调和完成后重启 Zabbix Agent 服务

use async_trait::async_trait;
use common::{Error, Result};
use tokio::process::Command;
use tracing::{error, info};

/// 服务控制 Trait
#[async_trait]
pub trait ServiceControl: Send + Sync + 'static {
    /// 重启服务
    async fn restart(&self) -> Result<()>;

    /// 服务名称
    fn name(&self) -> &str;
}

/// 通过 systemctl 管理的服务
pub struct SystemdService {
    unit: String,
}

impl SystemdService {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }
}

#[async_trait]
impl ServiceControl for SystemdService {
    async fn restart(&self) -> Result<()> {
        info!("🔄 重启服务: {}", self.unit);

        let output = Command::new("systemctl")
            .arg("restart")
            .arg(&self.unit)
            .output()
            .await
            .map_err(|e| Error::Service(format!("Failed to run systemctl: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("systemctl restart {} failed: {}", self.unit, stderr);
            return Err(Error::Service(format!(
                "无法重启服务 {}: {}",
                self.unit,
                stderr.trim()
            )));
        }

        info!("✅ 服务 {} 已重启", self.unit);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.unit
    }
}
