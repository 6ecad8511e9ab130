/// 配置管理

#[derive(Debug, Clone)]
pub struct Config {
    pub powershell_bin: String,
    pub log_level: String,
    /// 写入 LLD 数据的上报主机名
    pub report_hostname: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        let powershell_bin = std::env::var("POWERSHELL_BIN")
            .unwrap_or_else(|_| "powershell.exe".to_string());

        // stdout 由 Zabbix 直接解析，默认只输出警告
        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "warn".to_string());

        let report_hostname = std::env::var("REPORT_HOSTNAME")
            .unwrap_or_else(|_| hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()));

        Ok(Self {
            powershell_bin,
            log_level,
            report_hostname,
        })
    }
}
