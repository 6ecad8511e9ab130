/// Zabbix 低级发现（LLD）数据
///
/// 字段名是 LLD 宏，Zabbix 会把它们代入监控项原型

use common::utils::flag;
use common::{DiskUsage, VirtualMachine};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscoveryRecord {
    #[serde(rename = "{#VM.NAME}")]
    pub name: String,
    #[serde(rename = "{#VM.VERSION}")]
    pub version: String,
    #[serde(rename = "{#VM.CLUSTERED}")]
    pub clustered: u8,
    #[serde(rename = "{#VM.HOST}")]
    pub host: String,
    #[serde(rename = "{#VM.GEN}")]
    pub generation: u8,
    #[serde(rename = "{#VM.ISREPLICA}")]
    pub is_replica: u8,
    #[serde(rename = "{#VM.CPU}")]
    pub cpu: u32,
    #[serde(rename = "{#VM.MEMDEMAND}")]
    pub memory_demand: u64,
    #[serde(rename = "{#VM.DISKCAPACITY}")]
    pub disk_capacity: u64,
    #[serde(rename = "{#VM.DISKUSED}")]
    pub disk_used: u64,
    #[serde(rename = "{#VM.IP}")]
    pub ip_addresses: String,
    #[serde(rename = "{#VM.REPORTHOST}")]
    pub report_host: String,
}

impl DiscoveryRecord {
    pub fn new(vm: &VirtualMachine, usage: DiskUsage, report_host: &str) -> Self {
        Self {
            name: vm.name.clone(),
            version: vm.version.clone(),
            clustered: flag(vm.is_clustered),
            host: vm.computer_name.clone(),
            generation: vm.generation,
            is_replica: flag(vm.is_replica()),
            cpu: vm.processor_count,
            memory_demand: vm.memory_demand,
            disk_capacity: usage.capacity,
            disk_used: usage.used,
            ip_addresses: vm.ip_addresses.join(","),
            report_host: report_host.to_string(),
        }
    }
}

/// LLD 报文：`{"data":[...]}`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Discovery {
    pub data: Vec<DiscoveryRecord>,
}
