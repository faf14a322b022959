//! Runtime configuration.
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{ClassificationCache, SessionCookieParams, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS};
use crate::detect::{SignatureMatcher, SignatureSet};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lifetime of a persisted client token, in seconds.
    pub ttl_seconds: u64,
    /// Attributes copied onto every token cookie.
    pub cookie: SessionCookieParams,
    /// JSON signature file replacing the built-in set.
    pub signatures: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS as u64,
            cookie: SessionCookieParams::default(),
            signatures: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(json)?;
        config.ttl()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading config");
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// TTL as a duration. Must be within 1 ..= [`MAX_TTL_SECONDS`].
    pub fn ttl(&self) -> Result<Duration, Error> {
        if self.ttl_seconds == 0 {
            return Err(Error::Config("ttl_seconds must be greater than zero".to_string()));
        }
        i64::try_from(self.ttl_seconds)
            .ok()
            .filter(|secs| *secs <= MAX_TTL_SECONDS)
            .map(Duration::seconds)
            .ok_or_else(|| {
                Error::Config(format!(
                    "ttl_seconds out of range: {} (max {})",
                    self.ttl_seconds, MAX_TTL_SECONDS
                ))
            })
    }

    /// The configured signature set, or the built-in one.
    pub fn signature_set(&self) -> Result<SignatureSet, Error> {
        match &self.signatures {
            Some(path) => SignatureSet::from_path(path),
            None => Ok(SignatureSet::builtin()),
        }
    }

    /// Compile the signatures and assemble a cache.
    pub fn build_cache(&self) -> Result<ClassificationCache<SignatureMatcher>, Error> {
        let matcher = match &self.signatures {
            Some(_) => SignatureMatcher::new(&self.signature_set()?)?,
            None => SignatureMatcher::builtin(),
        };
        Ok(ClassificationCache::new(matcher)
            .with_ttl(self.ttl()?)
            .with_cookie_params(self.cookie.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ttl().unwrap(), Duration::seconds(7200));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"ttl_seconds": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let config = Config {
            ttl_seconds: u64::MAX,
            ..Default::default()
        };
        assert!(config.ttl().is_err());
    }

    #[test]
    fn test_ttl_above_cookie_cap_rejected() {
        let result = Config::from_json(r#"{"ttl_seconds": 10000000000000}"#);
        assert!(matches!(result, Err(Error::Config(_))));

        let at_cap = format!(r#"{{"ttl_seconds": {}}}"#, MAX_TTL_SECONDS);
        let config = Config::from_json(&at_cap).unwrap();
        let cache = config.build_cache().unwrap();
        let outcome = cache.classify(&crate::ClientToken::absent(), "iPhone", true, chrono::Utc::now());
        assert_eq!(outcome.cookies.len(), 3);
    }

    #[test]
    fn test_build_cache_applies_settings() {
        let config = Config::from_json(
            r#"{"ttl_seconds": 60, "cookie": {"path": "/m", "secure": true}}"#,
        )
        .unwrap();
        let cache = config.build_cache().unwrap();
        assert_eq!(cache.ttl(), Duration::seconds(60));
        assert_eq!(cache.cookie_params().path, "/m");
        assert!(cache.cookie_params().secure);
        assert_eq!(cache.detector().version(), crate::detect::BUILTIN_VERSION);
    }

    #[test]
    fn test_load_with_signature_file() {
        let dir = tempfile::tempdir().unwrap();
        let sig_path = dir.path().join("signatures.json");
        let mut sig_file = fs::File::create(&sig_path).unwrap();
        write!(
            sig_file,
            r#"{{"version": "custom-7", "phones": [{{"name": "palm", "pattern": "Centro"}}]}}"#
        )
        .unwrap();

        let config_path = dir.path().join("config.json");
        let config_json = serde_json::json!({ "signatures": sig_path });
        fs::write(&config_path, config_json.to_string()).unwrap();

        let config = Config::load(&config_path).unwrap();
        let cache = config.build_cache().unwrap();
        assert_eq!(cache.detector().version(), "custom-7");
        assert_eq!(
            cache.detector().device_type("Palm Centro"),
            crate::detect::DeviceType::Palm
        );
    }

    #[test]
    fn test_missing_signature_file() {
        let config = Config {
            signatures: Some(PathBuf::from("/nonexistent/signatures.json")),
            ..Default::default()
        };
        assert!(matches!(config.build_cache(), Err(Error::Io(_))));
    }
}
