//! services/api/src/web/middleware.rs
//!
//! Identity middleware. Authentication happens at the identity provider in
//! front of this service, which forwards the signed-in user as headers.
//!
//! The `x-user-*` headers are trusted as-is. Only the identity-provider proxy
//! may set them: it must strip any copies sent by clients, and browsers must
//! never send them directly. They are left out of the CORS allow-list for
//! that reason.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use career_portal_core::Identity;
use tracing::debug;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// The identity of the current request, or `None` for a signed-out visitor.
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity(pub Option<Identity>);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Reads the forwarded identity. Both the user id and the email are required.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let user_id = header(headers, USER_ID_HEADER)?;
    let email = header(headers, USER_EMAIL_HEADER)?;
    Some(Identity {
        user_id: user_id.to_string(),
        email: email.to_string(),
        display_name: header(headers, USER_NAME_HEADER).map(str::to_string),
    })
}

/// Middleware that resolves the request's identity and stores it in the request extensions.
///
/// Signed-out requests pass through with `CurrentIdentity(None)`; the portal
/// operations decide which actions need an identity.
pub async fn attach_identity(mut req: Request, next: Next) -> Response {
    let identity = identity_from_headers(req.headers());
    if let Some(identity) = &identity {
        debug!(user_id = %identity.user_id, "request identity resolved");
    }
    req.extensions_mut().insert(CurrentIdentity(identity));
    next.run(req).await
}
