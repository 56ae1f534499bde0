use super::cookie::RefreshCookie;
use super::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{debug, warn};
use warp::http::{HeaderValue, StatusCode, header};
use warp::{Rejection, Reply, reject};

pub async fn recover_error(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if let Some(rejection) = err.find::<ApiRejection>() {
        let code = rejection.code.clone();
        let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
        let mut response = warp::reply::with_status(json, code.status()).into_response();
        if let Some(cookie) = &rejection.set_cookie {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }
        return Ok(response);
    }

    let code = if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
    {
        ApiErrorCode::BadRequest
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        ApiErrorCode::internal(format!("unhandled rejection: {:?}", err))
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()).into_response())
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
pub enum ApiErrorCode {
    #[error("User does not exist")]
    UserNotExist,
    #[error("Password is incorrect")]
    PasswordIncorrect,
    #[error("Refresh token is incorrect")]
    TokenIncorrect,
    #[error("Refresh token is expired")]
    TokenExpired,
    #[error("Client fingerprint does not match")]
    FingerprintIncorrect,
    #[error("Access token is invalid")]
    CredentialInvalid,
    #[error("Malformed request")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::UserNotExist
            | ApiErrorCode::PasswordIncorrect
            | ApiErrorCode::TokenIncorrect
            | ApiErrorCode::TokenExpired
            | ApiErrorCode::FingerprintIncorrect
            | ApiErrorCode::CredentialInvalid => StatusCode::UNAUTHORIZED,
            ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        if error.is_external() {
            debug!(%error, "request rejected");
        }
        match error {
            AuthError::UserNotExist => ApiErrorCode::UserNotExist,
            AuthError::PasswordIncorrect => ApiErrorCode::PasswordIncorrect,
            AuthError::TokenIncorrect => ApiErrorCode::TokenIncorrect,
            AuthError::TokenExpired => ApiErrorCode::TokenExpired,
            AuthError::FingerprintIncorrect => ApiErrorCode::FingerprintIncorrect,
            AuthError::CredentialInvalid => ApiErrorCode::CredentialInvalid,
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

/// Error code plus an optional `Set-Cookie` to send along with it.
#[derive(Debug)]
pub struct ApiRejection {
    pub code: ApiErrorCode,
    pub set_cookie: Option<String>,
}

impl reject::Reject for ApiRejection {}

impl ApiRejection {
    pub fn plain(error: AuthError) -> Rejection {
        reject::custom(ApiRejection {
            code: error.into(),
            set_cookie: None,
        })
    }

    /// Clears the refresh cookie when the held token is no longer usable.
    pub fn with_cookie(error: AuthError, cookie: &RefreshCookie) -> Rejection {
        let set_cookie = error.discards_refresh_token().then(|| cookie.clear());
        reject::custom(ApiRejection {
            code: error.into(),
            set_cookie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_external_errors_to_unauthorized() {
        let code = ApiErrorCode::from(AuthError::FingerprintIncorrect);
        assert_eq!(code, ApiErrorCode::FingerprintIncorrect);
        assert_eq!(code.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn hides_internal_details() {
        let code = ApiErrorCode::from(AuthError::Store("connection refused".into()));
        assert_eq!(code, ApiErrorCode::InternalError);
        assert_eq!(code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code.to_string(), "Internal error");
    }
}
