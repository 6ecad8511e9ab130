/// 配置管理

/// Zabbix Agent 配置文件默认位置
pub const DEFAULT_AGENT_CONF: &str = "/etc/zabbix/zabbix_agentd.conf";

/// Zabbix Agent 默认服务名
pub const DEFAULT_AGENT_SERVICE: &str = "zabbix-agent";

#[derive(Debug, Clone)]
pub struct Config {
    pub agent_conf: String,
    pub agent_service: String,
    pub log_level: String,
    /// 交互输入的默认值
    pub default_server: Option<String>,
    pub default_server_active: Option<String>,
    pub default_hostname: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        let agent_conf = std::env::var("ZABBIX_AGENT_CONF")
            .unwrap_or_else(|_| DEFAULT_AGENT_CONF.to_string());

        let agent_service = std::env::var("ZABBIX_AGENT_SERVICE")
            .unwrap_or_else(|_| DEFAULT_AGENT_SERVICE.to_string());

        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        let default_server = non_empty_var("ZABBIX_SERVER");
        let default_server_active = non_empty_var("ZABBIX_SERVER_ACTIVE");

        let default_hostname = non_empty_var("ZABBIX_HOSTNAME").or_else(|| {
            hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
        });

        Ok(Self {
            agent_conf,
            agent_service,
            log_level,
            default_server,
            default_server_active,
            default_hostname,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
