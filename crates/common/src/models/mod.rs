/// 共享数据模型
///
/// 虚拟机、磁盘挂载和磁盘用量，字段命名与 Hyper-V cmdlet 的 JSON 输出保持一致

use serde::{Deserialize, Deserializer, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// 把 JSON 中的 null 当作默认值处理（PowerShell 经常为空属性输出 null）
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 集成服务状态
///
/// 输出给 Zabbix 时使用数值编码：0 = 最新，1 = 需要更新，2 = 未知
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Option<String>", into = "u8")]
pub enum IntegrationServicesState {
    UpToDate,
    UpdateRequired,
    #[default]
    Unknown,
}

impl IntegrationServicesState {
    pub fn code(self) -> u8 {
        match self {
            Self::UpToDate => 0,
            Self::UpdateRequired => 1,
            Self::Unknown => 2,
        }
    }
}

impl From<&str> for IntegrationServicesState {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "up to date" | "uptodate" => Self::UpToDate,
            "update required" | "updaterequired" => Self::UpdateRequired,
            _ => Self::Unknown,
        }
    }
}

impl From<Option<String>> for IntegrationServicesState {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl From<IntegrationServicesState> for u8 {
    fn from(state: IntegrationServicesState) -> Self {
        state.code()
    }
}

/// 虚拟机信息（每次查询重新采集，不做持久化）
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct VirtualMachine {
    /// 虚拟机 GUID，同一主机上名称可能重复，Id 不会
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    pub generation: u8,
    pub is_clustered: bool,
    /// 虚拟机所在的 Hyper-V 主机
    #[serde(deserialize_with = "null_as_default")]
    pub computer_name: String,
    pub processor_count: u32,
    pub memory_demand: u64,
    pub memory_assigned: u64,
    #[serde(rename = "CPUUsage")]
    pub cpu_usage: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    pub uptime_seconds: f64,
    pub numa_nodes_count: u32,
    pub numa_socket_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub integration_services_version: String,
    pub integration_services_state: IntegrationServicesState,
    #[serde(deserialize_with = "null_as_default")]
    pub replication_mode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub replication_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub replication_health: String,
    #[serde(deserialize_with = "null_as_default")]
    pub automatic_start_action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub automatic_stop_action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub automatic_critical_error_action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
}

impl VirtualMachine {
    /// 是否为副本虚拟机（Replica / ExtendedReplica）
    pub fn is_replica(&self) -> bool {
        matches!(self.replication_mode.as_str(), "Replica" | "ExtendedReplica")
    }

    /// 运行时长（秒，四舍五入）
    pub fn uptime_rounded(&self) -> u64 {
        if self.uptime_seconds.is_finite() && self.uptime_seconds > 0.0 {
            self.uptime_seconds.round() as u64
        } else {
            0
        }
    }
}

/// Hyper-V 报告的磁盘挂载记录（未分类）
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachedDisk {
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    pub disk_number: Option<u32>,
    /// 主机上路径是否存在且可解析
    pub path_exists: bool,
}

/// 磁盘类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskKind {
    /// 虚拟磁盘镜像（VHD/VHDX）
    FileBacked { path: String },
    /// 直通物理磁盘
    Physical { disk_number: Option<u32> },
}

impl DiskKind {
    /// 每块磁盘只分类一次：路径存在即为镜像文件，否则视为直通磁盘
    pub fn classify(disk: &AttachedDisk) -> Self {
        if disk.path_exists && !disk.path.is_empty() {
            Self::FileBacked {
                path: disk.path.clone(),
            }
        } else {
            Self::Physical {
                disk_number: disk.disk_number,
            }
        }
    }
}

impl From<&AttachedDisk> for DiskKind {
    fn from(disk: &AttachedDisk) -> Self {
        Self::classify(disk)
    }
}

/// 磁盘用量（字节）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub capacity: u64,
    pub used: u64,
}

impl DiskUsage {
    pub fn new(capacity: u64, used: u64) -> Self {
        Self { capacity, used }
    }
}

impl Add for DiskUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            capacity: self.capacity.saturating_add(rhs.capacity),
            used: self.used.saturating_add(rhs.used),
        }
    }
}

impl AddAssign for DiskUsage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for DiskUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
