use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::session::MAX_SESSION_TTL;

/// 会话存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

impl FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(SessionBackend::Redis),
            "memory" => Ok(SessionBackend::Memory),
            other => Err(format!("unknown session store: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub session_backend: SessionBackend,
    pub session_ttl_secs: u64,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub redirect_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let session_ttl_secs = match env::var("SESSION_TTL") {
            Ok(raw) => parse_ttl_secs(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid SESSION_TTL {:?} (must be 1..={}s), using 3600s",
                    raw,
                    MAX_SESSION_TTL.as_secs()
                );
                3600
            }),
            Err(_) => 3600,
        };
        let session_backend = match env::var("SESSION_STORE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to redis", e);
                SessionBackend::Redis
            }),
            Err(_) => SessionBackend::Redis,
        };

        Ok(Config {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".into()),
            session_backend,
            session_ttl_secs,
            google_client_id: env::var("GOOGLE_CLIENT_ID")?,
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")?,
            redirect_url: env::var("REDIRECT_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

// "3600" 按秒解析，"2h" 按小时解析，超过上限视为无效
fn parse_ttl_secs(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let secs = match raw.strip_suffix('h') {
        Some(hours) => hours.parse::<u64>().ok()?.checked_mul(3600)?,
        None => raw.parse::<u64>().ok()?,
    };
    (secs > 0 && secs <= MAX_SESSION_TTL.as_secs()).then_some(secs)
}
