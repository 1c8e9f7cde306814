/// Request authentication for post-service
///
/// Handlers that mutate state take a `UserId` argument; the extractor
/// validates the `Authorization: Bearer` token and hands over the caller's
/// id. Public read endpoints simply omit the argument. The core trusts the
/// extracted id verbatim - who may hold a token is the identity layer's
/// problem.
use crate::auth;
use actix_web::dev::Payload;
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

/// Authenticated caller id extracted from a validated bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(user_id_from_request(req))
    }
}

fn user_id_from_request(req: &HttpRequest) -> Result<UserId, Error> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("Invalid Authorization scheme"))?;

    let claims = auth::validate_token(token).map_err(|err| {
        tracing::debug!("token validation failed: {err}");
        ErrorUnauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.claims.sub)
        .map_err(|_| ErrorUnauthorized("Invalid user ID"))?;

    Ok(UserId(user_id))
}
