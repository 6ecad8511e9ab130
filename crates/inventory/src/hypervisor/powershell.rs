/// PowerShell 执行器与 Hyper-V 实现
///
/// 每个查询都是一段以 `ConvertTo-Json -Compress` 结尾的脚本，输出交给 serde 解析

use async_trait::async_trait;
use common::{AttachedDisk, Error, Result, VirtualMachine};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, error};

use super::{HypervisorBackend, VhdInfo};

/// 所有脚本的公共前缀：出错即终止，输出不带 BOM 的 UTF-8
const SCRIPT_PRELUDE: &str =
    "$ErrorActionPreference = 'Stop'; [Console]::OutputEncoding = [System.Text.UTF8Encoding]::new($false); ";

const LIST_VMS_SCRIPT: &str = r#"
@(Get-VM | ForEach-Object {
    [PSCustomObject]@{
        Id                           = [string]$_.Id
        Name                         = $_.Name
        Version                      = [string]$_.Version
        Generation                   = $_.Generation
        IsClustered                  = [bool]$_.IsClustered
        ComputerName                 = $_.ComputerName
        ProcessorCount               = $_.ProcessorCount
        MemoryDemand                 = [int64]$_.MemoryDemand
        MemoryAssigned               = [int64]$_.MemoryAssigned
        CPUUsage                     = $_.CPUUsage
        State                        = $_.State.ToString()
        UptimeSeconds                = $_.Uptime.TotalSeconds
        NumaNodesCount               = $_.NumaNodesCount
        NumaSocketCount              = $_.NumaSocketCount
        IntegrationServicesVersion   = [string]$_.IntegrationServicesVersion
        IntegrationServicesState     = [string]$_.IntegrationServicesState
        ReplicationMode              = $_.ReplicationMode.ToString()
        ReplicationState             = $_.ReplicationState.ToString()
        ReplicationHealth            = $_.ReplicationHealth.ToString()
        AutomaticStartAction         = $_.AutomaticStartAction.ToString()
        AutomaticStopAction          = $_.AutomaticStopAction.ToString()
        AutomaticCriticalErrorAction = $_.AutomaticCriticalErrorAction.ToString()
        IpAddresses                  = @($_.NetworkAdapters | ForEach-Object { $_.IPAddresses } | Where-Object { $_ })
    }
}) | ConvertTo-Json -Depth 3 -Compress
"#;

/// PowerShell 单引号字符串转义
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// 去掉开头的 BOM 与首尾空白（Windows PowerShell 5.1 重定向输出时可能带 BOM）
fn clean_output(stdout: &str) -> &str {
    stdout.trim_start_matches('\u{feff}').trim()
}

/// 把 ConvertTo-Json 的输出统一成数组
///
/// 单个对象会被输出为对象而非数组，空集合没有任何输出
pub fn parse_json_array<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    let trimmed = clean_output(stdout);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let items = match serde_json::from_str::<Value>(trimmed)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

/// 解析数值输出，空输出视为 0
pub fn parse_u64(stdout: &str) -> Result<u64> {
    let trimmed = clean_output(stdout);
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|e| Error::Hypervisor(format!("无法解析数值输出 {:?}: {}", trimmed, e)))
}

/// 列出虚拟机硬盘的脚本
///
/// 同一主机上虚拟机可以重名，所以有 Id 时按 Id 定位
fn list_disks_script(vm: &VirtualMachine) -> String {
    let selector = if vm.id.is_empty() {
        format!("Get-VM -Name '{}'", escape(&vm.name))
    } else {
        format!("Get-VM -Id '{}'", escape(&vm.id))
    };

    format!(
        r#"
@({selector} | Get-VMHardDiskDrive | ForEach-Object {{
    [PSCustomObject]@{{
        Path       = [string]$_.Path
        DiskNumber = $_.DiskNumber
        PathExists = [bool]($_.Path -and (Test-Path -LiteralPath $_.Path -ErrorAction SilentlyContinue))
    }}
}}) | ConvertTo-Json -Compress
"#
    )
}

/// PowerShell 执行器
#[derive(Debug, Clone)]
pub struct PsExecutor {
    program: String,
}

impl PsExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 执行脚本并返回 stdout
    pub async fn run(&self, script: &str) -> Result<String> {
        debug!("Running PowerShell script: {}", script.trim());

        let output = Command::new(&self.program)
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-ExecutionPolicy")
            .arg("Bypass")
            .arg("-Command")
            .arg(format!("{}{}", SCRIPT_PRELUDE, script))
            .output()
            .await
            .map_err(|e| Error::Hypervisor(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("PowerShell script failed: {}", stderr.trim());
            return Err(Error::Hypervisor(format!("PowerShell 执行失败: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// 执行脚本并解析为数组
    pub async fn run_json_array<T: DeserializeOwned>(&self, script: &str) -> Result<Vec<T>> {
        let stdout = self.run(script).await?;
        parse_json_array(&stdout)
    }

    /// 执行脚本并解析为单个对象
    pub async fn run_json_as<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        let stdout = self.run(script).await?;
        serde_json::from_str(clean_output(&stdout)).map_err(Error::from)
    }

    /// 执行脚本并解析为整数
    pub async fn run_u64(&self, script: &str) -> Result<u64> {
        let stdout = self.run(script).await?;
        parse_u64(&stdout)
    }
}

/// 基于 PowerShell 的 Hyper-V 实现
pub struct PowerShellBackend {
    ps: PsExecutor,
}

impl PowerShellBackend {
    pub fn new(ps: PsExecutor) -> Self {
        Self { ps }
    }
}

#[async_trait]
impl HypervisorBackend for PowerShellBackend {
    async fn list_vms(&self) -> Result<Vec<VirtualMachine>> {
        self.ps.run_json_array(LIST_VMS_SCRIPT).await
    }

    async fn list_disks(&self, vm: &VirtualMachine) -> Result<Vec<AttachedDisk>> {
        self.ps.run_json_array(&list_disks_script(vm)).await
    }

    async fn vhd_info(&self, path: &str) -> Result<VhdInfo> {
        let script = format!(
            "Get-VHD -Path '{}' | Select-Object Size, FileSize | ConvertTo-Json -Compress",
            escape(path)
        );
        self.ps
            .run_json_as(&script)
            .await
            .map_err(|e| Error::Storage(format!("无法读取 VHD 信息 {}: {}", path, e)))
    }

    async fn physical_disk_size(&self, disk_number: u32) -> Result<u64> {
        let script = format!(
            "[int64](Get-Disk -Number {} | Measure-Object -Property Size -Sum).Sum",
            disk_number
        );
        self.ps.run_u64(&script).await
    }

    async fn volume_remaining(&self, disk_number: u32) -> Result<u64> {
        let script = format!(
            "[int64](Get-Partition -DiskNumber {} | Get-Volume | Measure-Object -Property SizeRemaining -Sum).Sum",
            disk_number
        );
        self.ps.run_u64(&script).await
    }
}
