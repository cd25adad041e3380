use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// 带过期时间的键值存储，对应 SET EX / GET / DEL
///
/// 过期由存储负责：TTL 过后 `get` 必须返回 `None`。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// 删除不存在的键不是错误
    async fn del(&self, key: &str) -> Result<(), StoreError>;
}
