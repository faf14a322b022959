//! Device Detect - user-agent device classifier
//!
//! Classifies a client as mobile, tablet or desktop, and optionally as a
//! specific phone family, from its user-agent string. Results are cached on
//! the client in cookies for two hours so repeat requests skip matching.
//!
//! # Architecture
//!
//! 1. [`detect`]: ordered signature tables and the pure matching decision
//! 2. [`cache`]: client token validation and write-through cookies
//! 3. [`config`]: JSON configuration for TTL, cookie attributes and
//!    signature data
//!
//! # Example
//!
//! ```
//! use device_detect::{classify, ClientToken, DeviceClass, DeviceType, Lookup};
//!
//! let ua = "Mozilla/5.0 (BlackBerry; U; BlackBerry 9900; en) Version/7.1.0.346 Mobile Safari/534.11+";
//! let now = chrono::Utc::now();
//!
//! let outcome = classify(&ClientToken::absent(), ua, true, now);
//! assert_eq!(outcome.lookup, Lookup::Miss);
//! assert_eq!(outcome.result.class, DeviceClass::Mobile);
//! assert_eq!(outcome.result.device_type, DeviceType::BlackBerry);
//!
//! for cookie in &outcome.cookies {
//!     println!("Set-Cookie: {}", cookie);
//! }
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub use error::Error;

// Signature matching
pub mod detect;

// Client-held result cache
pub mod cache;

pub mod config;

pub use cache::{ClassificationCache, ClientToken, Lookup, Outcome, SessionCookieParams, SetCookie};
pub use config::Config;
pub use detect::{
    ClassificationResult, Detector, DeviceClass, DeviceType, Signature, SignatureMatcher,
    SignatureSet,
};

mod error {
    use thiserror::Error;

    /// Errors raised while loading configuration or signature data.
    ///
    /// Classification itself never fails.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("Invalid pattern in signature {name}: {source}")]
        Pattern {
            name: String,
            #[source]
            source: regex::Error,
        },

        #[error("Unknown device type: {0}")]
        UnknownDeviceType(String),

        #[error("Configuration error: {0}")]
        Config(String),
    }
}

static DEFAULT_CACHE: Lazy<ClassificationCache> =
    Lazy::new(|| ClassificationCache::new(SignatureMatcher::builtin()));

/// Classify a user-agent with the built-in signatures, bypassing any cache.
pub fn classify_user_agent(user_agent: &str) -> ClassificationResult {
    DEFAULT_CACHE.detector().classify(user_agent)
}

/// Classify a client with the built-in signatures and default cache settings.
///
/// See [`ClassificationCache::classify`].
pub fn classify(
    token: &ClientToken,
    user_agent: &str,
    persist: bool,
    now: DateTime<Utc>,
) -> Outcome {
    DEFAULT_CACHE.classify(token, user_agent, persist, now)
}
