/// Agent 配置流程
///
/// 依次调和所有配置项，内容有变化时写回文件，最后无条件重启服务

use common::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::reconcile::{reconcile, ConfigEntry, Outcome};
use crate::service::ServiceControl;
use crate::store::ConfigStore;

/// 配置流程
pub struct AgentSetup {
    store: Arc<dyn ConfigStore>,
    service: Arc<dyn ServiceControl>,
}

impl AgentSetup {
    pub fn new(store: Arc<dyn ConfigStore>, service: Arc<dyn ServiceControl>) -> Self {
        Self { store, service }
    }

    /// 调和配置并重启服务，返回每个配置项的结果
    pub async fn apply(&self, entries: &[ConfigEntry]) -> Result<Vec<(String, Outcome)>> {
        info!("📝 调和配置文件: {}", self.store.location());

        let original = self.store.read().await?;
        let mut content = original.clone();
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            let reconciled = reconcile(&content, entry)?;
            debug!("{} -> {:?}", entry.line(), reconciled.outcome);
            content = reconciled.content;
            outcomes.push((entry.key.clone(), reconciled.outcome));
        }

        if content != original {
            self.store.write(&content).await?;
            info!("✅ 配置文件已更新");
        } else {
            info!("配置文件无需修改");
        }

        self.service.restart().await?;

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct MemoryStore {
        content: Mutex<String>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        fn new(content: &str) -> Arc<Self> {
            Arc::new(Self {
                content: Mutex::new(content.to_string()),
                writes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn read(&self) -> Result<String> {
            Ok(self.content.lock().await.clone())
        }

        async fn write(&self, content: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.content.lock().await = content.to_string();
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    struct FakeService {
        restarts: AtomicUsize,
        fail: bool,
    }

    impl FakeService {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                restarts: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ServiceControl for FakeService {
        async fn restart(&self) -> Result<()> {
            self.restarts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Service("unit not found".to_string()));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "zabbix-agent"
        }
    }

    fn entries() -> Vec<ConfigEntry> {
        vec![
            ConfigEntry::new("Server", "10.0.0.1"),
            ConfigEntry::new("ServerActive", "10.0.0.2"),
            ConfigEntry::new("Hostname", "web01"),
        ]
    }

    #[tokio::test]
    async fn test_apply_reconciles_all_keys() {
        let store = MemoryStore::new("# Server=\nServerActive=127.0.0.1\n");
        let service = FakeService::new(false);
        let setup = AgentSetup::new(store.clone(), service.clone());

        let outcomes = setup.apply(&entries()).await.unwrap();
        assert_eq!(
            outcomes,
            vec![
                ("Server".to_string(), Outcome::Uncommented),
                ("ServerActive".to_string(), Outcome::Updated),
                ("Hostname".to_string(), Outcome::Appended),
            ]
        );
        assert_eq!(
            store.read().await.unwrap(),
            "Server=10.0.0.1\nServerActive=10.0.0.2\nHostname=web01\n"
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(service.restarts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent_but_still_restarts() {
        let store = MemoryStore::new("Server=127.0.0.1\n");
        let service = FakeService::new(false);
        let setup = AgentSetup::new(store.clone(), service.clone());

        setup.apply(&entries()).await.unwrap();
        let after_first = store.read().await.unwrap();

        let outcomes = setup.apply(&entries()).await.unwrap();
        assert!(outcomes.iter().all(|(_, o)| *o == Outcome::Unchanged));
        assert_eq!(store.read().await.unwrap(), after_first);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(service.restarts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_restart_failure_propagates() {
        let store = MemoryStore::new("");
        let service = FakeService::new(true);
        let setup = AgentSetup::new(store.clone(), service);

        let result = setup.apply(&entries()).await;
        assert!(matches!(result, Err(Error::Service(_))));
        // 文件已在重启前写入
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }
}
