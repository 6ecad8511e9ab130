/// 虚拟化平台访问
///
/// 通过 PowerShell Hyper-V / Storage cmdlet 查询虚拟机与磁盘信息

pub mod backend;
pub mod powershell;

pub use backend::{HypervisorBackend, VhdInfo};
pub use powershell::{PowerShellBackend, PsExecutor};

#[cfg(test)]
pub mod fake;
