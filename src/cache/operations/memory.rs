use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::cache::store::{SessionStore, StoreError};

/// 进程内会话存储，用于本地开发和测试
///
/// 过期时间使用 tokio 时钟，测试中可以暂停并快进。
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let deadline = now
            .checked_add(ttl)
            .ok_or_else(|| StoreError::Unavailable(format!("ttl out of range: {:?}", ttl)))?;

        let mut entries = self.lock()?;
        // 写入时顺带清理已过期的键，避免从未被读取的会话常驻内存
        entries.retain(|_, (_, d)| *d > now);
        entries.insert(key.to_string(), (value, deadline));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some((_, deadline)) if Instant::now() >= *deadline => {
                entries.remove(key);
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_value() {
        let store = MemorySessionStore::new();
        store
            .set_ex("session:1", "v".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("session:1").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("session:2").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = MemorySessionStore::new();
        store
            .set_ex("session:1", "v".into(), Duration::from_secs(5))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(store.get("session:1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("session:1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn writes_sweep_expired_entries() {
        let store = MemorySessionStore::new();
        for i in 0..1000 {
            store
                .set_ex(&format!("session:{}", i), "v".into(), Duration::from_secs(1))
                .await
                .unwrap();
        }
        assert_eq!(store.len(), 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        store
            .set_ex("session:fresh", "v".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("session:fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn oversized_ttl_is_an_error() {
        let store = MemorySessionStore::new();
        let result = store
            .set_ex("session:1", "v".into(), Duration::from_secs(u64::MAX))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_key_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.del("session:missing").await.is_ok());
    }
}
