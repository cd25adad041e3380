use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::oauth::OAuthError;
use crate::session::SessionError;

#[derive(Debug)]
pub enum AppError {
    MissingCode,
    TokenExchangeFailed(OAuthError),
    UserInfoFailed(OAuthError),
    UserInfoDecodeFailed(OAuthError),
    SessionStoreFailed(SessionError),
}

impl From<OAuthError> for AppError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::UserInfo(_) => AppError::UserInfoFailed(e),
            OAuthError::DecodeUserInfo(_) => AppError::UserInfoDecodeFailed(e),
            _ => AppError::TokenExchangeFailed(e),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::SessionStoreFailed(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingCode => (StatusCode::BAD_REQUEST, "code not found"),
            AppError::TokenExchangeFailed(e) => {
                tracing::error!("OAuth exchange failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "token exchange failed")
            }
            AppError::UserInfoFailed(e) => {
                tracing::error!("Userinfo request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to get user info")
            }
            AppError::UserInfoDecodeFailed(e) => {
                tracing::error!("Userinfo response undecodable: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to decode user info")
            }
            AppError::SessionStoreFailed(e) => {
                tracing::error!("Session creation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to store session")
            }
        };

        (status, message).into_response()
    }
}
