//! Google OAuth 2.0 授权码登录
//!
//! 协议细节交给 `oauth2` crate，这里只负责拼授权地址、换取 token、
//! 再用 token 拉取用户信息。state 参数每次随机生成，但不做校验。

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};

use crate::config::Config;
use crate::models::UserIdentity;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("invalid oauth configuration: {0}")]
    Config(String),
    #[error("token exchange failed: {0}")]
    Exchange(String),
    #[error("failed to get user info: {0}")]
    UserInfo(#[from] reqwest::Error),
    #[error("failed to decode user info: {0}")]
    DecodeUserInfo(reqwest::Error),
}

/// 身份提供方：给出授权地址，并用授权码换取已验证的用户身份
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorize_url(&self) -> String;

    async fn exchange_code(&self, code: &str) -> Result<UserIdentity, OAuthError>;
}

type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    client: ConfiguredClient,
    http: reqwest::Client,
    userinfo_url: String,
}

impl GoogleOAuth {
    pub fn new(config: &Config) -> Result<Self, OAuthError> {
        let client = BasicClient::new(ClientId::new(config.google_client_id.clone()))
            .set_client_secret(ClientSecret::new(config.google_client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(GOOGLE_AUTH_URL.to_string())
                    .map_err(|e| OAuthError::Config(e.to_string()))?,
            )
            .set_token_uri(
                TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
                    .map_err(|e| OAuthError::Config(e.to_string()))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_url.clone())
                    .map_err(|e| OAuthError::Config(e.to_string()))?,
            );

        // token 端点不允许跟随重定向
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OAuthError::Config(e.to_string()))?;

        Ok(Self {
            client,
            http,
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuth {
    fn authorize_url(&self) -> String {
        let (url, _state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(SCOPES.iter().map(|s| Scope::new(s.to_string())))
            .add_extra_param("access_type", "offline")
            .url();
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<UserIdentity, OAuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| OAuthError::Exchange(e.to_string()))?;

        let identity =
            fetch_user_info(&self.http, &self.userinfo_url, token.access_token().secret()).await?;

        tracing::debug!("Google login verified for {}", identity.email);
        Ok(identity)
    }
}

/// 用 access token 拉取用户信息，响应体无法解析时单独报错
async fn fetch_user_info(
    http: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<UserIdentity, OAuthError> {
    http.get(url)
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json::<UserIdentity>()
        .await
        .map_err(|e| {
            if e.is_decode() {
                OAuthError::DecodeUserInfo(e)
            } else {
                OAuthError::UserInfo(e)
            }
        })
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::to_bytes,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
    };

    use super::*;
    use crate::config::SessionBackend;
    use crate::error::AppError;

    /// 启动本地 userinfo 服务，返回其地址
    async fn spawn_userinfo_server() -> String {
        async fn valid(headers: HeaderMap) -> impl IntoResponse {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer token-123");
            if !authorized {
                return (StatusCode::UNAUTHORIZED, String::new());
            }
            (
                StatusCode::OK,
                r#"{"email":"a@x.com","name":"A","picture":"https://example.com/a.png"}"#
                    .to_string(),
            )
        }

        let app = Router::new()
            .route("/valid", get(valid))
            .route("/garbled", get(|| async { "<html>not json</html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn fetches_user_info_with_bearer_token() {
        let base = spawn_userinfo_server().await;
        let http = reqwest::Client::builder().no_proxy().build().unwrap();

        let identity = fetch_user_info(&http, &format!("{}/valid", base), "token-123")
            .await
            .unwrap();
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.display_name, "A");

        let rejected = fetch_user_info(&http, &format!("{}/valid", base), "wrong").await;
        assert!(matches!(rejected, Err(OAuthError::UserInfo(_))));
    }

    #[tokio::test]
    async fn undecodable_user_info_is_reported_separately() {
        let base = spawn_userinfo_server().await;
        let http = reqwest::Client::builder().no_proxy().build().unwrap();

        let err = fetch_user_info(&http, &format!("{}/garbled", base), "token-123")
            .await
            .unwrap_err();
        assert!(matches!(err, OAuthError::DecodeUserInfo(_)));

        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"failed to decode user info");
    }

    fn config() -> Config {
        Config {
            redis_url: "redis://127.0.0.1:6379/".into(),
            session_backend: SessionBackend::Memory,
            session_ttl_secs: 3600,
            google_client_id: "client-id".into(),
            google_client_secret: "client-secret".into(),
            redirect_url: "http://localhost:8080/callback".into(),
            server_host: "::".into(),
            server_port: 8080,
        }
    }

    #[test]
    fn authorize_url_requests_profile_scopes_offline() {
        let oauth = GoogleOAuth::new(&config()).unwrap();
        let url = oauth.authorize_url();

        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("userinfo.email"));
        assert!(url.contains("userinfo.profile"));
        assert!(url.contains("state="));
    }

    #[test]
    fn rejects_invalid_redirect_url() {
        let mut config = config();
        config.redirect_url = "not a url".into();
        assert!(matches!(
            GoogleOAuth::new(&config),
            Err(OAuthError::Config(_))
        ));
    }
}
