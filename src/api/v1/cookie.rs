use crate::domain_model::RefreshTokenRecord;

pub const REFRESH_COOKIE: &str = "refresh_token";

/// Formats the `Set-Cookie` values that carry the refresh token id.
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    path: String,
}

impl RefreshCookie {
    pub fn new(path: impl Into<String>) -> Self {
        RefreshCookie { path: path.into() }
    }

    /// Session-scoped unless the record is persistent.
    pub fn set(&self, record: &RefreshTokenRecord) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly; Secure; SameSite=None",
            REFRESH_COOKIE, record.id, self.path
        );
        if record.persistent {
            cookie.push_str(&format!(
                "; Expires={}",
                record.expires_at.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        cookie
    }

    pub fn clear(&self) -> String {
        format!(
            "{}=; Path={}; HttpOnly; Secure; SameSite=None; Max-Age=0",
            REFRESH_COOKIE, self.path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;
    use chrono::{TimeZone, Utc};

    fn record(persistent: bool) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id: RefreshTokenId(uuid::Uuid::from_u128(1)),
            expires_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
            fingerprint: vec![0; 32],
            persistent,
            user_id: UserId(uuid::Uuid::from_u128(2)),
        }
    }

    #[test]
    fn persistent_cookie_has_expiry() {
        let cookie = RefreshCookie::new("/api/v1/token").set(&record(true));
        assert_eq!(
            cookie,
            "refresh_token=00000000-0000-0000-0000-000000000001; Path=/api/v1/token; \
             HttpOnly; Secure; SameSite=None; Expires=Wed, 04 Mar 2026 05:06:07 GMT"
        );
    }

    #[test]
    fn session_cookie_has_no_expiry() {
        let cookie = RefreshCookie::new("/").set(&record(false));
        assert!(!cookie.contains("Expires"));
        assert!(cookie.starts_with("refresh_token=00000000-0000-0000-0000-000000000001;"));
    }

    #[test]
    fn cleared_cookie_is_empty_and_expired() {
        let cookie = RefreshCookie::new("/t").clear();
        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/t"));
    }
}
