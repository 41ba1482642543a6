use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::store::UserStore;
use serde::Serialize;

/// Message sent with every authentication failure, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

const BEARER_PREFIX: &str = "Bearer ";

/// The caller of a request, as established by [`resolve_identity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
}

fn unauthenticated() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into())
}

/// Turns a raw `Authorization` header value into the user it belongs to.
///
/// The header must use the `Bearer ` scheme, the token must verify, and its
/// subject must still exist. Each of those failures produces the same
/// `Unauthorized` error. Storage failures surface as internal errors.
pub async fn resolve_identity(
    authorization: Option<&str>,
    tokens: &TokenService,
    users: &dyn UserStore,
) -> Result<AuthenticatedUser, AppError> {
    let token = authorization
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(unauthenticated)?;

    let claims = tokens.verify(token).ok_or_else(unauthenticated)?;

    let user = users
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(unauthenticated)?;

    Ok(AuthenticatedUser {
        id: user.id,
        email: user.email,
    })
}
