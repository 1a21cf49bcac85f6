//! SCIM Authentication
//!
//! Builds the HTTP Basic `Authorization` header. The password is only ever
//! exposed inside [`with_secret`], and every intermediate buffer holding it is
//! zeroed on drop.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;
use secrecy::zeroize::Zeroizing;
use secrecy::{ExposeSecret, SecretString};

/// Run `f` with the plaintext secret; the borrow cannot outlive the call.
pub fn with_secret<R>(secret: &SecretString, f: impl FnOnce(&str) -> R) -> R {
    f(secret.expose_secret())
}

/// Build a `Basic base64(username:password)` header value.
pub fn basic_auth_header(username: &str, password: &SecretString) -> ConnectorResult<HeaderValue> {
    let encoded = with_secret(password, |password| {
        let credentials = Zeroizing::new(format!("{}:{}", username, password));
        Zeroizing::new(format!("Basic {}", STANDARD.encode(credentials.as_bytes())))
    });

    let mut value = HeaderValue::from_str(&encoded).map_err(|e| {
        ConnectorError::InvalidConfiguration(format!("credentials cannot form a header: {}", e))
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Authorization header for the configuration, if it sends one.
///
/// Computed fresh on every request so no copy of the encoded credentials
/// lives beyond the request that carries it.
pub fn authorization_header(config: &ConnectorConfig) -> ConnectorResult<Option<HeaderValue>> {
    if !config.sends_basic_auth() {
        return Ok(None);
    }
    let Some(password) = config.password.as_ref() else {
        return Ok(None);
    };

    let username = config.username.as_deref().unwrap_or("");
    basic_auth_header(username, password).map(Some)
}
