#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user does not exist")]
    UserNotExist,
    #[error("password is incorrect")]
    PasswordIncorrect,
    #[error("token is incorrect")]
    TokenIncorrect,
    #[error("token is expired")]
    TokenExpired,
    #[error("fingerprint is incorrect")]
    FingerprintIncorrect,
    #[error("credential is invalid")]
    CredentialInvalid,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// External errors are caused by the caller's input and are safe to
    /// describe back to them. Everything else is logged and hidden.
    pub fn is_external(&self) -> bool {
        match self {
            AuthError::UserNotExist
            | AuthError::PasswordIncorrect
            | AuthError::TokenIncorrect
            | AuthError::TokenExpired
            | AuthError::FingerprintIncorrect
            | AuthError::CredentialInvalid => true,
            AuthError::Store(_) | AuthError::InternalError(_) => false,
        }
    }

    /// Whether the client should drop the refresh token it is holding.
    pub fn discards_refresh_token(&self) -> bool {
        matches!(
            self,
            AuthError::TokenIncorrect | AuthError::TokenExpired | AuthError::FingerprintIncorrect
        )
    }
}
