use serde::Deserialize;

/// 身份提供方回调参数
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}
