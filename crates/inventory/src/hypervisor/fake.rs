/// 测试用的内存实现

use async_trait::async_trait;
use common::{AttachedDisk, Error, Result, VirtualMachine};
use std::collections::HashMap;

use super::backend::{HypervisorBackend, VhdInfo};

#[derive(Default)]
pub struct FakeBackend {
    pub vms: Vec<VirtualMachine>,
    pub fail_list_vms: bool,
    /// 键为虚拟机 Id，Id 为空时用名称
    pub disks: HashMap<String, Vec<AttachedDisk>>,
    pub vhds: HashMap<String, VhdInfo>,
    /// disk_number -> (容量, 卷剩余空间)
    pub physical: HashMap<u32, (u64, u64)>,
}

#[async_trait]
impl HypervisorBackend for FakeBackend {
    async fn list_vms(&self) -> Result<Vec<VirtualMachine>> {
        if self.fail_list_vms {
            return Err(Error::Hypervisor("Get-VM : access denied".to_string()));
        }
        Ok(self.vms.clone())
    }

    async fn list_disks(&self, vm: &VirtualMachine) -> Result<Vec<AttachedDisk>> {
        let key = if vm.id.is_empty() { &vm.name } else { &vm.id };
        self.disks
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Hypervisor(format!("VM {} not found", key)))
    }

    async fn vhd_info(&self, path: &str) -> Result<VhdInfo> {
        self.vhds
            .get(path)
            .copied()
            .ok_or_else(|| Error::Storage(format!("access denied: {}", path)))
    }

    async fn physical_disk_size(&self, disk_number: u32) -> Result<u64> {
        self.physical
            .get(&disk_number)
            .map(|(size, _)| *size)
            .ok_or_else(|| Error::Storage(format!("disk {} not found", disk_number)))
    }

    async fn volume_remaining(&self, disk_number: u32) -> Result<u64> {
        self.physical
            .get(&disk_number)
            .map(|(_, remaining)| *remaining)
            .ok_or_else(|| Error::Storage(format!("disk {} not found", disk_number)))
    }
}
