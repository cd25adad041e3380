use serde::{Deserialize, Serialize};

/// 身份提供方返回的已验证用户信息，也是会话中保存的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub email: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
    #[serde(rename = "picture", default)]
    pub picture_url: String,
}
