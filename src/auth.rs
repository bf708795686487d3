use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;

use crate::config::AdminConfig;

// ── Admin bearer token guard ──

/// Guard for `/admin/api`: `Authorization: Bearer <token>` must match the
/// configured admin token. An empty configured token turns the API off.
pub struct AdminToken;

#[derive(Debug, PartialEq)]
pub enum AdminAuthError {
    Disabled,
    Missing,
    Invalid,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = AdminAuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let expected = match request.guard::<&State<AdminConfig>>().await.succeeded() {
            Some(cfg) if !cfg.token.trim().is_empty() => cfg.token.trim().to_string(),
            _ => return Outcome::Error((Status::Forbidden, AdminAuthError::Disabled)),
        };

        let presented = match request
            .headers()
            .get_one("Authorization")
            .and_then(bearer_token)
        {
            Some(t) => t,
            None => return Outcome::Error((Status::Unauthorized, AdminAuthError::Missing)),
        };

        if tokens_match(presented, &expected) {
            Outcome::Success(AdminToken)
        } else {
            log::warn!(
                "[auth] rejected admin request from {}",
                request
                    .client_ip()
                    .map(|ip| ip.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
            Outcome::Error((Status::Unauthorized, AdminAuthError::Invalid))
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Length-independent comparison over the bytes.
fn tokens_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= (x ^ y) as usize;
    }
    diff == 0
}
