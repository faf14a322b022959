//! Client-side classification cache.
//!
//! [`ClassificationCache`] wraps a [`Detector`] with a read-through,
//! optionally write-through cache held by the client as cookies. A token that
//! is missing, malformed or past its expiry is a miss, never an error.
//!
//! Token lifecycle: absent, populated on a persisted miss, expired once the
//! TTL elapses, and from then on treated as absent again. Expiry is judged
//! lazily when the token is read.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use device_detect::cache::{ClassificationCache, ClientToken, Lookup};
//! use device_detect::detect::{DeviceClass, SignatureMatcher};
//!
//! let cache = ClassificationCache::new(SignatureMatcher::builtin());
//! let now = Utc::now();
//! let ua = "Mozilla/5.0 (iPad; CPU OS 12_2 like Mac OS X) Mobile/15E148 Safari/604.1";
//!
//! let first = cache.classify(&ClientToken::absent(), ua, true, now);
//! assert_eq!(first.lookup, Lookup::Miss);
//! assert_eq!(first.result.class, DeviceClass::Tablet);
//!
//! let token = ClientToken::from_set_cookies(&first.cookies);
//! let second = cache.classify(&token, ua, true, now + Duration::hours(1));
//! assert_eq!(second.lookup, Lookup::Hit);
//! assert_eq!(second.result, first.result);
//! ```

mod cookie;
mod token;

pub use cookie::{SessionCookieParams, SetCookie};
pub use token::{ClientToken, TokenRejection, DEVICE_COOKIE, DEVICE_TYPE_COOKIE, EXPIRES_COOKIE};

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::detect::{ClassificationResult, Detector, SignatureMatcher};

/// Lifetime of a persisted token.
pub const DEFAULT_TTL_SECONDS: i64 = 7200;

/// Longest accepted token lifetime (400 days, the cap browsers apply to
/// cookie expiry).
pub const MAX_TTL_SECONDS: i64 = 400 * 24 * 60 * 60;

/// Whether a result came from the client token or from the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Hit,
    Miss,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Hit => "hit",
            Lookup::Miss => "miss",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of [`ClassificationCache::classify`].
#[derive(Debug, Clone)]
pub struct Outcome {
    pub result: ClassificationResult,
    pub lookup: Lookup,
    /// Cookies to set on the response. Empty unless this was a persisted miss.
    pub cookies: Vec<SetCookie>,
}

/// Detector wrapped with a client-held result cache.
pub struct ClassificationCache<D = SignatureMatcher> {
    detector: D,
    ttl: Duration,
    cookie_params: SessionCookieParams,
}

impl<D: Detector> ClassificationCache<D> {
    /// Cache with the default two hour TTL and default cookie attributes.
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            ttl: Duration::seconds(DEFAULT_TTL_SECONDS),
            cookie_params: SessionCookieParams::default(),
        }
    }

    /// Set the token lifetime, clamped to 1 second ..= [`MAX_TTL_SECONDS`].
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        let min = Duration::seconds(1);
        let max = Duration::seconds(MAX_TTL_SECONDS);
        self.ttl = ttl.clamp(min, max);
        if self.ttl != ttl {
            warn!(
                requested = ttl.num_seconds(),
                applied = self.ttl.num_seconds(),
                "Token TTL out of range, clamped"
            );
        }
        self
    }

    pub fn with_cookie_params(mut self, params: SessionCookieParams) -> Self {
        self.cookie_params = params;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cookie_params(&self) -> &SessionCookieParams {
        &self.cookie_params
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Cached result carried by `token`, if it is still valid at `now`.
    pub fn lookup(&self, token: &ClientToken, now: DateTime<Utc>) -> Option<ClassificationResult> {
        match token.validate(now) {
            Ok(result) => Some(result),
            Err(reason) => {
                debug!(%reason, "Client token rejected");
                None
            }
        }
    }

    /// Classify a client.
    ///
    /// Returns the token's result when it is valid at `now`; otherwise runs
    /// the detector on `identifying`. With `persist` set, a miss also yields
    /// the cookies that store the fresh result until `now + ttl`. A hit never
    /// re-issues cookies.
    pub fn classify(
        &self,
        token: &ClientToken,
        identifying: &str,
        persist: bool,
        now: DateTime<Utc>,
    ) -> Outcome {
        if let Some(result) = self.lookup(token, now) {
            debug!(class = %result.class, device_type = %result.device_type, "Cache hit");
            return Outcome {
                result,
                lookup: Lookup::Hit,
                cookies: Vec::new(),
            };
        }

        let result = self.detector.detect(identifying);
        debug!(
            class = %result.class,
            device_type = %result.device_type,
            persist,
            "Cache miss"
        );

        let cookies = if persist {
            self.token_cookies(&result, now)
        } else {
            Vec::new()
        };

        Outcome {
            result,
            lookup: Lookup::Miss,
            cookies,
        }
    }

    /// Cookies that persist `result` from `now` for one TTL.
    pub fn token_cookies(&self, result: &ClassificationResult, now: DateTime<Utc>) -> Vec<SetCookie> {
        let expires = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let params = &self.cookie_params;
        vec![
            SetCookie::new(DEVICE_COOKIE, result.class.code().to_string(), expires, params),
            SetCookie::new(DEVICE_TYPE_COOKIE, result.device_type.key(), expires, params),
            SetCookie::new(EXPIRES_COOKIE, expires.timestamp().to_string(), expires, params),
        ]
    }
}

impl Default for ClassificationCache<SignatureMatcher> {
    fn default() -> Self {
        Self::new(SignatureMatcher::builtin())
    }
}
