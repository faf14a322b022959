//! Outgoing cookies.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attributes shared with the session cookie of the enclosing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionCookieParams {
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for SessionCookieParams {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: true,
        }
    }
}

/// A cookie to send back in a `Set-Cookie` response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl SetCookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        expires: DateTime<Utc>,
        params: &SessionCookieParams,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires,
            path: params.path.clone(),
            domain: params.domain.clone(),
            secure: params.secure,
            http_only: params.http_only,
        }
    }

    /// Render as a `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Expires={}",
            self.name,
            self.value,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
        )?;
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={}", domain)?;
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_params() {
        let params = SessionCookieParams::default();
        assert_eq!(params.path, "/");
        assert!(params.domain.is_none());
        assert!(!params.secure);
        assert!(params.http_only);
    }

    #[test]
    fn test_header_value_default_params() {
        let expires = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        let cookie = SetCookie::new("device", "1", expires, &SessionCookieParams::default());
        assert_eq!(
            cookie.header_value(),
            "device=1; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/; HttpOnly"
        );
    }

    #[test]
    fn test_header_value_all_attributes() {
        let expires = Utc.with_ymd_and_hms(2026, 1, 1, 14, 0, 0).unwrap();
        let params = SessionCookieParams {
            path: "/app".to_string(),
            domain: Some("example.com".to_string()),
            secure: true,
            http_only: false,
        };
        let cookie = SetCookie::new("device_type", "iphone", expires, &params);
        assert_eq!(
            cookie.to_string(),
            "device_type=iphone; Expires=Thu, 01 Jan 2026 14:00:00 GMT; Path=/app; Domain=example.com; Secure"
        );
    }

    #[test]
    fn test_params_from_partial_json() {
        let params: SessionCookieParams = serde_json::from_str(r#"{"secure": true}"#).unwrap();
        assert!(params.secure);
        assert_eq!(params.path, "/");
        assert!(params.http_only);
    }
}
