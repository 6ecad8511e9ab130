/// 虚拟机磁盘用量汇总
///
/// 单块磁盘统计失败只记录日志并按 0 计入，不影响其余磁盘和虚拟机

use common::utils::format_bytes;
use common::{DiskKind, DiskUsage, Error, Result, VirtualMachine};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::hypervisor::HypervisorBackend;

pub struct DiskUsageCollector {
    backend: Arc<dyn HypervisorBackend>,
}

impl DiskUsageCollector {
    pub fn new(backend: Arc<dyn HypervisorBackend>) -> Self {
        Self { backend }
    }

    /// 汇总虚拟机所有磁盘的容量与用量
    pub async fn collect(&self, vm: &VirtualMachine) -> DiskUsage {
        let vm_name = vm.name.as_str();
        let disks = match self.backend.list_disks(vm).await {
            Ok(disks) => disks,
            Err(e) => {
                warn!("无法列出虚拟机 {} 的磁盘，用量按 0 计: {}", vm_name, e);
                return DiskUsage::default();
            }
        };

        let mut total = DiskUsage::default();
        for disk in &disks {
            let kind = DiskKind::classify(disk);
            match self.disk_usage(&kind).await {
                Ok(usage) => {
                    debug!(
                        "VM {} disk {:?}: capacity={}, used={}",
                        vm_name,
                        kind,
                        format_bytes(usage.capacity),
                        format_bytes(usage.used)
                    );
                    total += usage;
                }
                Err(e) => {
                    warn!("虚拟机 {} 的磁盘 {} 统计失败，按 0 计: {}", vm_name, disk.path, e);
                }
            }
        }

        total
    }

    async fn disk_usage(&self, kind: &DiskKind) -> Result<DiskUsage> {
        match kind {
            DiskKind::FileBacked { path } => {
                let info = self.backend.vhd_info(path).await?;
                Ok(DiskUsage::new(info.size, info.file_size))
            }
            DiskKind::Physical { disk_number } => {
                let disk_number = disk_number
                    .ok_or_else(|| Error::Storage("无法解析直通磁盘编号".to_string()))?;
                let capacity = self.backend.physical_disk_size(disk_number).await?;
                // used 为各卷剩余空间（SizeRemaining）之和，并非已用空间
                let used = self.backend.volume_remaining(disk_number).await?;
                Ok(DiskUsage::new(capacity, used))
            }
        }
    }
}
