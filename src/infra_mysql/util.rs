use crate::application_port::*;
use uuid::Uuid;

pub fn store_err(err: sqlx::Error) -> AuthError {
    AuthError::Store(err.to_string())
}

#[inline]
pub fn uuid_from_bytes(bytes: &[u8]) -> Result<Uuid, AuthError> {
    Uuid::from_slice(bytes).map_err(|e| AuthError::Store(e.to_string()))
}
