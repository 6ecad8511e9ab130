/// 虚拟化平台抽象层

use async_trait::async_trait;
use common::{AttachedDisk, Result, VirtualMachine};
use serde::Deserialize;

/// 虚拟磁盘镜像信息（字节）
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VhdInfo {
    /// 声明的最大容量
    pub size: u64,
    /// 镜像文件当前占用
    pub file_size: u64,
}

/// 虚拟化平台 Trait
#[async_trait]
pub trait HypervisorBackend: Send + Sync + 'static {
    /// 列出主机上所有虚拟机
    async fn list_vms(&self) -> Result<Vec<VirtualMachine>>;

    /// 列出虚拟机挂载的硬盘（优先按 Id 定位虚拟机）
    async fn list_disks(&self, vm: &VirtualMachine) -> Result<Vec<AttachedDisk>>;

    /// 获取虚拟磁盘镜像信息
    async fn vhd_info(&self, path: &str) -> Result<VhdInfo>;

    /// 物理磁盘容量
    async fn physical_disk_size(&self, disk_number: u32) -> Result<u64>;

    /// 物理磁盘上所有卷的剩余空间之和
    async fn volume_remaining(&self, disk_number: u32) -> Result<u64>;
}
