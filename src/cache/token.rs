//! Client-held classification token.
//!
//! The token is whatever the client echoed back in its `Cookie` header. Every
//! field is untrusted and is validated before a cached result is believed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cache::SetCookie;
use crate::detect::{ClassificationResult, DeviceClass, DeviceType};

/// Cookie holding the numeric [`DeviceClass`] code.
pub const DEVICE_COOKIE: &str = "device";
/// Cookie holding the [`DeviceType`] key, `0` for unknown.
pub const DEVICE_TYPE_COOKIE: &str = "device_type";
/// Cookie holding the expiry as unix seconds.
pub const EXPIRES_COOKIE: &str = "device_expires";

/// Why a token was not accepted as a cache hit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("no device cookie")]
    Absent,
    #[error("device cookie is not a class code: {0:?}")]
    InvalidDevice(String),
    #[error("device_type cookie is not a known type: {0:?}")]
    InvalidDeviceType(String),
    #[error("no expiry cookie")]
    MissingExpiry,
    #[error("expiry cookie is not a timestamp: {0:?}")]
    InvalidExpiry(String),
    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// Raw token fields as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientToken {
    pub device: Option<String>,
    pub device_type: Option<String>,
    pub expires: Option<String>,
}

impl ClientToken {
    /// A client that sent no token.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Parse a raw `Cookie` request header. Unrelated cookies are ignored and
    /// the first occurrence of a name wins.
    pub fn from_cookie_header(header: &str) -> Self {
        Self::from_pairs(header.split(';').filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            Some((name.trim(), value.trim()))
        }))
    }

    /// Build a token from name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut token = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                DEVICE_COOKIE => &mut token.device,
                DEVICE_TYPE_COOKIE => &mut token.device_type,
                EXPIRES_COOKIE => &mut token.expires,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.as_ref().to_string());
            }
        }
        token
    }

    /// The token a browser would echo after receiving `cookies`.
    pub fn from_set_cookies(cookies: &[SetCookie]) -> Self {
        Self::from_pairs(cookies.iter().map(|c| (c.name.as_str(), c.value.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.device.is_none() && self.device_type.is_none() && self.expires.is_none()
    }

    /// Validate the token at `now` and return the cached result it carries.
    ///
    /// `device` must be 1, 2 or 3. `device_type` may be missing or `0`
    /// (unknown) but otherwise must be a known key. `expires` must be present
    /// and `now` must not be past it.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ClassificationResult, TokenRejection> {
        let raw_device = self.device.as_deref().ok_or(TokenRejection::Absent)?;
        let class = raw_device
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(DeviceClass::from_code)
            .ok_or_else(|| TokenRejection::InvalidDevice(raw_device.to_string()))?;

        let device_type = match self.device_type.as_deref() {
            None => DeviceType::Unknown,
            Some(raw) => DeviceType::from_key(raw.trim())
                .ok_or_else(|| TokenRejection::InvalidDeviceType(raw.to_string()))?,
        };

        let raw_expires = self.expires.as_deref().ok_or(TokenRejection::MissingExpiry)?;
        let expires = raw_expires
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or_else(|| TokenRejection::InvalidExpiry(raw_expires.to_string()))?;

        if now > expires {
            return Err(TokenRejection::Expired(expires));
        }

        Ok(ClassificationResult::new(class, device_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn token(device: &str, device_type: Option<&str>, expires: i64) -> ClientToken {
        ClientToken {
            device: Some(device.to_string()),
            device_type: device_type.map(str::to_string),
            expires: Some(expires.to_string()),
        }
    }

    #[test]
    fn test_parse_cookie_header() {
        let t = ClientToken::from_cookie_header("SESS=abc; device=2;device_type=iphone ; device_expires=123; other");
        assert_eq!(t.device.as_deref(), Some("2"));
        assert_eq!(t.device_type.as_deref(), Some("iphone"));
        assert_eq!(t.expires.as_deref(), Some("123"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let t = ClientToken::from_cookie_header("device=1; device=3");
        assert_eq!(t.device.as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_header() {
        assert!(ClientToken::from_cookie_header("").is_empty());
        assert!(ClientToken::from_cookie_header("a=b; c=d").is_empty());
    }

    #[test]
    fn test_valid_token() {
        let expires = now().timestamp() + 60;
        let result = token("1", Some("samsung"), expires).validate(now()).unwrap();
        assert_eq!(result, ClassificationResult::new(DeviceClass::Mobile, DeviceType::Samsung));
    }

    #[test]
    fn test_missing_or_zero_type_is_unknown() {
        let expires = now().timestamp() + 60;
        for device_type in [None, Some("0")] {
            let result = token("2", device_type, expires).validate(now()).unwrap();
            assert_eq!(result.device_type, DeviceType::Unknown);
            assert_eq!(result.class, DeviceClass::Tablet);
        }
    }

    #[test]
    fn test_absent() {
        assert_eq!(ClientToken::absent().validate(now()), Err(TokenRejection::Absent));
    }

    #[test]
    fn test_corrupt_device_rejected() {
        let expires = now().timestamp() + 60;
        for raw in ["", "0", "abc", "-1", "4", "1.0", "999"] {
            assert_eq!(
                token(raw, None, expires).validate(now()),
                Err(TokenRejection::InvalidDevice(raw.to_string())),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let expires = now().timestamp() + 60;
        assert_eq!(
            token("1", Some("nokia"), expires).validate(now()),
            Err(TokenRejection::InvalidDeviceType("nokia".to_string()))
        );
    }

    #[test]
    fn test_expiry_required() {
        let t = ClientToken {
            device: Some("1".to_string()),
            ..Default::default()
        };
        assert_eq!(t.validate(now()), Err(TokenRejection::MissingExpiry));

        let t = ClientToken {
            expires: Some("soon".to_string()),
            ..t
        };
        assert_eq!(t.validate(now()), Err(TokenRejection::InvalidExpiry("soon".to_string())));
    }

    #[test]
    fn test_expired() {
        let expires = now().timestamp() - 1;
        assert!(matches!(
            token("3", None, expires).validate(now()),
            Err(TokenRejection::Expired(_))
        ));
    }

    #[test]
    fn test_valid_at_exact_expiry() {
        let expires = now().timestamp();
        assert!(token("3", None, expires).validate(now()).is_ok());
    }
}
