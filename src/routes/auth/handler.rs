use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::OffsetDateTime;

use crate::{AppState, error::AppError};

use super::model::CallbackQuery;
use super::view::{LOGIN_PAGE, welcome_page};

/// 保存会话ID的 cookie 名
pub const SESSION_COOKIE: &str = "session";

/// 首页：已登录显示用户信息，否则显示登录入口
///
/// 会话过期和从未登录在这里没有区别。
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let user = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.resolve_session(cookie.value()).await,
        None => None,
    };

    match user {
        Some(user) => Html(welcome_page(&user)),
        None => Html(LOGIN_PAGE.to_string()),
    }
}

pub async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.provider.authorize_url())
}

#[axum::debug_handler]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(error) = &query.error {
        tracing::warn!("Identity provider returned error: {}", error);
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::MissingCode)?;

    let identity = state.provider.exchange_code(&code).await?;
    // 写入失败时不下发 cookie，用户保持未登录
    let issued = state.sessions.create_session(&identity).await?;

    let expires = OffsetDateTime::from_unix_timestamp(issued.expires_at.timestamp()).ok();
    let cookie = Cookie::build((SESSION_COOKIE, issued.id))
        .path("/")
        .http_only(true)
        .expires(expires);

    Ok((jar.add(cookie), Redirect::to("/")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.sessions.destroy_session(cookie.value()).await {
            tracing::warn!("Failed to delete session on logout: {}", e);
        }
    }

    // 空值加过去的过期时间，让浏览器删除 cookie
    let cleared = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .expires(OffsetDateTime::UNIX_EPOCH);

    (jar.add(cleared), Redirect::to("/"))
}
