/// 配置文件存储抽象
///
/// 读写被调和的配置文件。写入为原地覆盖，不做备份也不做原子替换

use async_trait::async_trait;
use common::{Error, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// 配置存储 Trait
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// 读取完整内容
    async fn read(&self) -> Result<String>;

    /// 覆盖写入完整内容
    async fn write(&self, content: &str) -> Result<()>;

    /// 存储位置描述（用于日志）
    fn location(&self) -> String;
}

/// 本地文件存储
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn read(&self) -> Result<String> {
        debug!("Reading config file: {:?}", self.path);
        fs::read_to_string(&self.path).await.map_err(|e| {
            Error::Config(format!("无法读取配置文件 {}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, content: &str) -> Result<()> {
        debug!("Writing config file: {:?} ({} bytes)", self.path, content.len());
        fs::write(&self.path, content).await.map_err(|e| {
            Error::Config(format!("无法写入配置文件 {}: {}", self.path.display(), e))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_store_read_write() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Server=127.0.0.1").unwrap();

        let store = FileConfigStore::new(file.path());
        assert_eq!(store.read().await.unwrap(), "Server=127.0.0.1\n");

        store.write("Server=10.0.0.1\n").await.unwrap();
        assert_eq!(store.read().await.unwrap(), "Server=10.0.0.1\n");
        assert_eq!(store.location(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("zabbix_agentd.conf"));

        match store.read().await {
            Err(Error::Config(msg)) => assert!(msg.contains("zabbix_agentd.conf")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
