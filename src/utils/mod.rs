use rand::RngCore;
use rand::rngs::OsRng;

/// 会话ID的随机字节数（256 位）
const SESSION_ID_BYTES: usize = 32;

/// 会话ID允许的最大长度
const MAX_SESSION_ID_LEN: usize = 128;

/// 生成会话ID：来自操作系统 CSPRNG 的随机字节，十六进制编码
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// 检查会话ID格式，不合法的ID不会发往存储
pub fn is_well_formed_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id.bytes().all(|b| b.is_ascii_alphanumeric())
}
