//! Authenticated identity. The upstream auth layer puts the user id in the
//! `x-user-id` header; this service trusts it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::response::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let value = parts
      .headers
      .get(USER_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .ok_or_else(|| AppError::unauthorized("missing user identity"))?;
    Ok(UserId(value.to_string()))
  }
}
