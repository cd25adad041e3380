use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use google_login::{
    AppState,
    cache::{MemorySessionStore, RedisSessionStore, SessionStore},
    config::{Config, SessionBackend},
    oauth::GoogleOAuth,
    routes,
    session::SessionManager,
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置会话存储
    let store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Redis => {
            let redis_client = redis::Client::open(config.redis_url.clone())
                .expect("Failed to create Redis client");
            let store = RedisSessionStore::new(Arc::new(redis_client));
            store.ping().await.expect("Failed to connect to Redis");
            tracing::info!("Connected to Redis at {}", config.redis_url);
            Arc::new(store)
        }
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory session store, sessions are lost on restart");
            Arc::new(MemorySessionStore::new())
        }
    };

    let provider = GoogleOAuth::new(&config).expect("Invalid Google OAuth configuration");

    // 设置应用状态
    let state = AppState {
        sessions: SessionManager::new(store, config.session_ttl()),
        provider: Arc::new(provider),
        config: config.clone(),
    };

    let router = routes::create_router(state.clone());

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
