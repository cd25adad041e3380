//! 会话管理
//!
//! 会话ID与用户身份之间的映射全部保存在存储中，进程内不持有任何会话状态。
//! 过期完全交给存储的 TTL；会话寿命在创建时确定，不会续期。
//!
//! 读取时的任何异常（键不存在、ID格式错误、内容无法解析、存储报错）
//! 一律视为未登录，绝不会退化成某个默认身份。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::keys::session_key;
use crate::cache::{SessionStore, StoreError};
use crate::models::UserIdentity;
use crate::utils::{generate_session_id, is_well_formed_session_id};

/// 会话寿命上限（一年）
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to store session: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("failed to serialize identity: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 新建会话的结果，`expires_at` 供 cookie 使用
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    /// TTL 取整到秒并限制在 1 秒到一年之间，存储和 cookie 使用同一个值
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        let secs = ttl.as_secs().clamp(1, MAX_SESSION_TTL.as_secs());
        Self {
            store,
            ttl: Duration::from_secs(secs),
        }
    }

    /// 创建会话：一次 SET EX 写入
    pub async fn create_session(
        &self,
        identity: &UserIdentity,
    ) -> Result<IssuedSession, SessionError> {
        let session_id = generate_session_id();
        let json = serde_json::to_string(identity)?;

        let expires_at = Utc::now() + chrono::Duration::seconds(self.ttl.as_secs() as i64);

        self.store
            .set_ex(&session_key(&session_id), json, self.ttl)
            .await?;

        tracing::debug!(
            "Session {}… created for {}, expires at {}",
            &session_id[..8],
            identity.email,
            expires_at
        );
        Ok(IssuedSession {
            id: session_id,
            expires_at,
        })
    }

    /// 解析会话，返回 `None` 表示未登录
    pub async fn resolve_session(&self, session_id: &str) -> Option<UserIdentity> {
        if !is_well_formed_session_id(session_id) {
            return None;
        }

        let json = match self.store.get(&session_key(session_id)).await {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Session lookup failed, treating as logged out: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!("Discarding undecodable session payload: {}", e);
                None
            }
        }
    }

    /// 删除会话，不存在的会话直接返回成功
    pub async fn destroy_session(&self, session_id: &str) -> Result<(), SessionError> {
        if !is_well_formed_session_id(session_id) {
            return Ok(());
        }

        self.store.del(&session_key(session_id)).await?;
        Ok(())
    }
}
