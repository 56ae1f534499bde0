use super::cookie::RefreshCookie;
use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::header;
use warp::reply::{self, Reply};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub persistent: bool,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    pub refresh_expires_at: DateTime<Utc>,
    pub persistent: bool,
}

#[derive(Debug, Serialize)]
pub struct Empty;

fn with_pair(pair: TokenPair, cookie: &RefreshCookie) -> reply::WithHeader<reply::Json> {
    let set_cookie = cookie.set(&pair.refresh_token);
    let body = ApiResponse::ok(TokenResponse {
        access_token: pair.access_token,
        refresh_expires_at: pair.refresh_token.expires_at,
        persistent: pair.refresh_token.persistent,
    });
    reply::with_header(reply::json(&body), header::SET_COOKIE, set_cookie)
}

pub async fn login(
    body: LoginRequest,
    fingerprint: Vec<u8>,
    user_verifier: Arc<dyn UserVerifier>,
    token_service: Arc<dyn TokenService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl Reply, warp::Rejection> {
    let user_id = user_verifier
        .verify(&body.name, &body.password)
        .await
        .map_err(ApiRejection::plain)?;

    let pair = token_service
        .create(user_id, &fingerprint, body.persistent)
        .await
        .map_err(ApiRejection::plain)?;

    Ok(with_pair(pair, &cookie))
}

pub async fn refresh(
    id: RefreshTokenId,
    fingerprint: Vec<u8>,
    token_service: Arc<dyn TokenService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl Reply, warp::Rejection> {
    let pair = token_service
        .refresh(id, &fingerprint)
        .await
        .map_err(|e| ApiRejection::with_cookie(e, &cookie))?;

    Ok(with_pair(pair, &cookie))
}

pub async fn revoke(
    id: RefreshTokenId,
    fingerprint: Vec<u8>,
    token_service: Arc<dyn TokenService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl Reply, warp::Rejection> {
    token_service
        .delete(id, &fingerprint)
        .await
        .map_err(|e| ApiRejection::with_cookie(e, &cookie))?;

    Ok(reply::with_header(
        reply::json(&ApiResponse::ok(Empty)),
        header::SET_COOKIE,
        cookie.clear(),
    ))
}

pub async fn revoke_all(
    id: RefreshTokenId,
    fingerprint: Vec<u8>,
    token_service: Arc<dyn TokenService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl Reply, warp::Rejection> {
    token_service
        .delete_all(id, &fingerprint)
        .await
        .map_err(|e| ApiRejection::with_cookie(e, &cookie))?;

    Ok(reply::with_header(
        reply::json(&ApiResponse::ok(Empty)),
        header::SET_COOKIE,
        cookie.clear(),
    ))
}

pub async fn session(principal: Principal) -> Result<impl Reply, warp::Rejection> {
    Ok(reply::json(&ApiResponse::ok(principal)))
}
