use super::cookie::{REFRESH_COOKIE, RefreshCookie};
use super::error::*;
use super::handler;
use crate::application_port::*;
use crate::domain_model::*;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cookie = Arc::new(RefreshCookie::new(server.cookie_path.clone()));

    let login = warp::post()
        .and(warp::path!("token"))
        .and(warp::body::json())
        .and(with_fingerprint())
        .and(with(server.user_verifier.clone()))
        .and(with(server.token_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path!("token" / "refresh"))
        .and(with_refresh_id(cookie.clone()))
        .and(with_fingerprint())
        .and(with(server.token_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::refresh);

    let revoke = warp::post()
        .and(warp::path!("token" / "revoke"))
        .and(with_refresh_id(cookie.clone()))
        .and(with_fingerprint())
        .and(with(server.token_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::revoke);

    let revoke_all = warp::post()
        .and(warp::path!("token" / "revoke-all"))
        .and(with_refresh_id(cookie.clone()))
        .and(with_fingerprint())
        .and(with(server.token_service.clone()))
        .and(with(cookie))
        .and_then(handler::revoke_all);

    let session = warp::get()
        .and(warp::path!("session"))
        .and(with_verification(server.auth_service.clone()))
        .and_then(handler::session);

    login.or(refresh).or(revoke).or(revoke_all).or(session)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Client signal the refresh token and access credentials are bound to.
pub fn client_signal(
    sec_ch_ua: Option<&str>,
    user_agent: Option<&str>,
    accept_language: Option<&str>,
    upgrade_insecure_requests: Option<&str>,
) -> Vec<u8> {
    format!(
        "{}:{}:{}:{}",
        sec_ch_ua.unwrap_or_default(),
        user_agent.unwrap_or_default(),
        accept_language.unwrap_or_default(),
        upgrade_insecure_requests.unwrap_or_default(),
    )
    .into_bytes()
}

fn with_fingerprint() -> impl Filter<Extract = (Vec<u8>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("sec-ch-ua")
        .and(warp::header::optional::<String>("user-agent"))
        .and(warp::header::optional::<String>("accept-language"))
        .and(warp::header::optional::<String>("upgrade-insecure-requests"))
        .map(
            |sec_ch_ua: Option<String>,
             user_agent: Option<String>,
             accept_language: Option<String>,
             upgrade: Option<String>| {
                client_signal(
                    sec_ch_ua.as_deref(),
                    user_agent.as_deref(),
                    accept_language.as_deref(),
                    upgrade.as_deref(),
                )
            },
        )
}

fn with_refresh_id(
    cookie: Arc<RefreshCookie>,
) -> impl Filter<Extract = (RefreshTokenId,), Error = warp::Rejection> + Clone {
    warp::cookie::optional(REFRESH_COOKIE).and_then(move |value: Option<String>| {
        let cookie = cookie.clone();
        async move {
            value
                .and_then(|value| value.parse::<RefreshTokenId>().ok())
                .ok_or_else(|| ApiRejection::with_cookie(AuthError::TokenIncorrect, &cookie))
        }
    })
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (Principal,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_fingerprint())
        .and_then(move |token: Option<String>, fingerprint: Vec<u8>| {
            let auth_service = auth_service.clone();
            async move {
                let token = token
                    .as_deref()
                    .and_then(|token| token.strip_prefix("Bearer "))
                    .ok_or_else(|| ApiRejection::plain(AuthError::CredentialInvalid))?;
                auth_service
                    .verify(&AccessToken(token.to_string()), &fingerprint)
                    .await
                    .map_err(ApiRejection::plain)
            }
        })
}
