use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::identity::{AuthenticatedUser, INVALID_CREDENTIALS_MESSAGE};
use crate::error::AppError;

/// Extracts the identity resolved by `AuthMiddleware` from request extensions.
///
/// Used on routes inside a scope wrapped by `AuthMiddleware`. Outside such a
/// scope there is no identity, and the request is rejected as unauthenticated.
impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into());
                ready(Err(err.into()))
            }
        }
    }
}
