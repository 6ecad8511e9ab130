/// 报告生成
///
/// 两种模式：
/// - `lld`：Zabbix 低级发现列表
/// - `full`：以虚拟机名称为键的全量指标

pub mod discovery;
pub mod metrics;

use common::Result;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::hypervisor::HypervisorBackend;
use crate::storage::DiskUsageCollector;

pub use discovery::{Discovery, DiscoveryRecord};
pub use metrics::{FullMetrics, VmMetrics};

/// 报告模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Lld,
    Full,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lld" => Ok(Action::Lld),
            "full" => Ok(Action::Full),
            other => Err(format!("未知的操作: {}", other)),
        }
    }
}

/// 报告生成器
pub struct Reporter {
    backend: Arc<dyn HypervisorBackend>,
    usage: DiskUsageCollector,
    report_host: String,
}

impl Reporter {
    pub fn new(backend: Arc<dyn HypervisorBackend>, report_host: impl Into<String>) -> Self {
        Self {
            usage: DiskUsageCollector::new(backend.clone()),
            backend,
            report_host: report_host.into(),
        }
    }

    /// 生成 LLD 数据
    pub async fn discovery(&self) -> Result<Discovery> {
        let vms = self.backend.list_vms().await?;
        info!("📋 找到 {} 个虚拟机", vms.len());

        let mut data = Vec::with_capacity(vms.len());
        for vm in &vms {
            let usage = self.usage.collect(vm).await;
            data.push(DiscoveryRecord::new(vm, usage, &self.report_host));
        }

        Ok(Discovery { data })
    }

    /// 生成全量指标
    pub async fn full_metrics(&self) -> Result<FullMetrics> {
        let vms = self.backend.list_vms().await?;
        info!("📋 找到 {} 个虚拟机", vms.len());

        let mut metrics = FullMetrics::new();
        for vm in &vms {
            let usage = self.usage.collect(vm).await;
            if metrics.insert(vm.name.clone(), VmMetrics::new(vm, usage)).is_some() {
                debug!("重复的虚拟机名称: {}", vm.name);
            }
        }

        Ok(metrics)
    }

    /// 生成紧凑 JSON
    pub async fn render(&self, action: Action) -> Result<String> {
        let json = match action {
            Action::Lld => serde_json::to_string(&self.discovery().await?)?,
            Action::Full => serde_json::to_string(&self.full_metrics().await?)?,
        };
        Ok(json)
    }
}
