/// 全量指标
///
/// 以虚拟机名称为键，供 Zabbix 依赖监控项通过 JSONPath 提取

use common::utils::flag;
use common::{DiskUsage, IntegrationServicesState, VirtualMachine};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VmMetrics {
    #[serde(rename = "State")]
    pub state: String,
    /// 秒，四舍五入
    #[serde(rename = "Uptime")]
    pub uptime: u64,
    #[serde(rename = "NumaNodes")]
    pub numa_nodes: u32,
    #[serde(rename = "NumaSockets")]
    pub numa_sockets: u32,
    #[serde(rename = "IntSvcVer")]
    pub integration_services_version: String,
    #[serde(rename = "IntSvcState")]
    pub integration_services_state: IntegrationServicesState,
    #[serde(rename = "CPUUsage")]
    pub cpu_usage: u32,
    #[serde(rename = "Memory")]
    pub memory_assigned: u64,
    #[serde(rename = "ReplMode")]
    pub replication_mode: String,
    #[serde(rename = "ReplState")]
    pub replication_state: String,
    #[serde(rename = "ReplHealth")]
    pub replication_health: String,
    #[serde(rename = "StartAction")]
    pub start_action: String,
    #[serde(rename = "StopAction")]
    pub stop_action: String,
    #[serde(rename = "CritErrAction")]
    pub critical_error_action: String,
    #[serde(rename = "IsClustered")]
    pub is_clustered: u8,
    #[serde(rename = "CPU")]
    pub cpu: u32,
    #[serde(rename = "MemDemand")]
    pub memory_demand: u64,
    #[serde(rename = "DiskCapacity")]
    pub disk_capacity: u64,
    #[serde(rename = "DiskUsed")]
    pub disk_used: u64,
}

impl VmMetrics {
    pub fn new(vm: &VirtualMachine, usage: DiskUsage) -> Self {
        Self {
            state: vm.state.clone(),
            uptime: vm.uptime_rounded(),
            numa_nodes: vm.numa_nodes_count,
            numa_sockets: vm.numa_socket_count,
            integration_services_version: vm.integration_services_version.clone(),
            integration_services_state: vm.integration_services_state,
            cpu_usage: vm.cpu_usage,
            memory_assigned: vm.memory_assigned,
            replication_mode: vm.replication_mode.clone(),
            replication_state: vm.replication_state.clone(),
            replication_health: vm.replication_health.clone(),
            start_action: vm.automatic_start_action.clone(),
            stop_action: vm.automatic_stop_action.clone(),
            critical_error_action: vm.automatic_critical_error_action.clone(),
            is_clustered: flag(vm.is_clustered),
            cpu: vm.processor_count,
            memory_demand: vm.memory_demand,
            disk_capacity: usage.capacity,
            disk_used: usage.used,
        }
    }
}

/// 全量报文：`{"<vm-name>":{...}}`，同名虚拟机只保留最后一个
pub type FullMetrics = BTreeMap<String, VmMetrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_fields() {
        let vm = VirtualMachine {
            name: "db01".to_string(),
            state: "Running".to_string(),
            uptime_seconds: 86399.5,
            integration_services_state: IntegrationServicesState::UpToDate,
            replication_mode: "None".to_string(),
            automatic_critical_error_action: "Pause".to_string(),
            processor_count: 8,
            ..Default::default()
        };

        let value = serde_json::to_value(VmMetrics::new(&vm, DiskUsage::new(10, 2))).unwrap();
        assert_eq!(value["State"], "Running");
        assert_eq!(value["Uptime"], 86400);
        assert_eq!(value["IntSvcState"], 0);
        assert_eq!(value["CritErrAction"], "Pause");
        assert_eq!(value["CPU"], 8);
        assert_eq!(value["DiskCapacity"], 10);
        assert_eq!(value["DiskUsed"], 2);
        assert_eq!(value.as_object().unwrap().len(), 19);
    }
}
