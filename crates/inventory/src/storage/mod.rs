/// 磁盘用量统计
///
/// 汇总虚拟机挂载的镜像磁盘与直通磁盘

pub mod usage;

pub use usage::DiskUsageCollector;
