/// 缓存键模块

pub mod session_keys;

pub use session_keys::session_key;
