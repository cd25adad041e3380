// 缓存模块
// 会话存储的键、接口和具体实现

pub mod keys;
pub mod operations;
pub mod store;

pub use operations::{MemorySessionStore, RedisSessionStore};
pub use store::{SessionStore, StoreError};
