//! Signed admin session cookies.
//!
//! The cookie value is `base64url(json) "." base64url(hmac_sha256(password, base64url(json)))`
//! where the JSON payload carries the admin email and an expiry in epoch milliseconds.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use ntr_core::{AdminConfig, Error, Result};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "admin_session";
const LOGIN_KEY: &str = "ntr-admin-login";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Admin login is not configured (missing ADMIN_EMAIL/ADMIN_PASSWORD).";

pub fn session_ttl() -> Duration {
    Duration::days(7)
}

#[derive(Serialize, Deserialize)]
struct SessionPayload {
    email: String,
    exp: i64,
}

fn mac(secret: &str, payload: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("Invalid session secret: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(mac)
}

pub fn create_session_token(email: &str, secret: &str, now: DateTime<Utc>) -> Result<String> {
    let payload = SessionPayload {
        email: email.to_string(),
        exp: (now + session_ttl()).timestamp_millis(),
    };
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?);
    let signature = URL_SAFE_NO_PAD.encode(mac(secret, &payload)?.finalize().into_bytes());
    Ok(format!("{}.{}", payload, signature))
}

/// Signature, expiry and email must all check out.
pub fn verify_session_token(token: &str, admin: &AdminConfig, now: DateTime<Utc>) -> bool {
    let Some((payload, signature)) = token.split_once('.') else {
        return false;
    };
    let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    let Ok(mac) = mac(&admin.password, payload) else {
        return false;
    };
    if mac.verify_slice(&signature).is_err() {
        return false;
    }

    let session: SessionPayload = match URL_SAFE_NO_PAD
        .decode(payload)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    {
        Some(session) => session,
        None => return false,
    };
    now.timestamp_millis() <= session.exp && session.email == admin.email
}

/// Whether the submitted credentials are the configured admin's. The
/// password is compared through HMAC tags so timing does not leak a prefix.
pub fn credentials_match(admin: &AdminConfig, email: &str, password: &str) -> bool {
    let (Ok(expected), Ok(given)) = (mac(LOGIN_KEY, &admin.password), mac(LOGIN_KEY, password)) else {
        return false;
    };
    let password_ok = given.verify_slice(&expected.finalize().into_bytes()).is_ok();
    password_ok & (email.trim() == admin.email)
}

pub fn session_cookie(token: String, secure: bool) -> Result<Cookie<'static>> {
    let raw = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        SESSION_COOKIE,
        token,
        session_ttl().num_seconds(),
        if secure { "; Secure" } else { "" }
    );
    Cookie::parse(raw).map_err(|e| Error::Validation(format!("Invalid session cookie: {}", e)))
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Whether the request carries a valid admin session.
pub fn is_admin(jar: &CookieJar, admin: Option<&AdminConfig>) -> bool {
    match (jar.get(SESSION_COOKIE), admin) {
        (Some(cookie), Some(admin)) => verify_session_token(cookie.value(), admin, Utc::now()),
        _ => false,
    }
}
