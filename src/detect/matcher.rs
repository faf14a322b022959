//! Compiled signature tables and the detection decision.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::{info, trace};

use crate::detect::{ClassificationResult, DeviceClass, DeviceType, Signature, SignatureSet};
use crate::Error;

/// Something that turns an identifying string into a classification.
///
/// Implementations must be pure: the same input always yields the same
/// result, and an empty or unrecognised input yields desktop/unknown.
pub trait Detector: Send + Sync {
    fn detect(&self, identifying: &str) -> ClassificationResult;
}

impl<D: Detector + ?Sized> Detector for &D {
    fn detect(&self, identifying: &str) -> ClassificationResult {
        (**self).detect(identifying)
    }
}

#[derive(Debug, Clone)]
struct CompiledSignature {
    name: String,
    pattern: Regex,
    unless: Option<Regex>,
}

impl CompiledSignature {
    fn compile(sig: &Signature) -> Result<Self, Error> {
        let pattern = compile_pattern(&sig.name, &sig.pattern)?;
        let unless = sig
            .unless
            .as_deref()
            .map(|p| compile_pattern(&sig.name, p))
            .transpose()?;
        Ok(Self {
            name: sig.name.clone(),
            pattern,
            unless,
        })
    }

    fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text) && !self.unless.as_ref().is_some_and(|u| u.is_match(text))
    }
}

fn compile_pattern(name: &str, pattern: &str) -> Result<Regex, Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::Pattern {
            name: name.to_string(),
            source,
        })
}

fn first_match<'a>(sigs: &'a [CompiledSignature], text: &str) -> Option<&'a CompiledSignature> {
    sigs.iter().find(|s| s.is_match(text))
}

static BUILTIN: Lazy<SignatureMatcher> = Lazy::new(|| {
    SignatureMatcher::new(&SignatureSet::builtin()).expect("built-in signatures must compile")
});

/// Stateless classifier over a compiled [`SignatureSet`].
///
/// Safe to share across threads; `Regex` matching takes `&self`.
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    version: String,
    /// Sorted by `DeviceType::ORDERED`; file order kept within one family.
    phones: Vec<(DeviceType, CompiledSignature)>,
    tablets: Vec<CompiledSignature>,
    platforms: Vec<CompiledSignature>,
}

impl SignatureMatcher {
    /// Compile a signature set. Fails on an invalid pattern or an unknown
    /// phone family, never later.
    pub fn new(set: &SignatureSet) -> Result<Self, Error> {
        set.validate()?;

        let mut phones = Vec::with_capacity(set.phones.len());
        for sig in &set.phones {
            let device_type = DeviceType::from_key(&sig.name)
                .ok_or_else(|| Error::UnknownDeviceType(sig.name.clone()))?;
            phones.push((device_type, CompiledSignature::compile(sig)?));
        }
        phones.sort_by_key(|(t, _)| t.rank());

        let tablets = set
            .tablets
            .iter()
            .map(CompiledSignature::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let platforms = set
            .platforms
            .iter()
            .map(CompiledSignature::compile)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            version = %set.version,
            phones = phones.len(),
            tablets = tablets.len(),
            platforms = platforms.len(),
            "Compiled signature set"
        );

        Ok(Self {
            version: set.version.clone(),
            phones,
            tablets,
            platforms,
        })
    }

    /// Matcher over the built-in signatures. Compiled once per process.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Version tag of the compiled signature set.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of compiled signatures.
    pub fn rule_count(&self) -> usize {
        self.phones.len() + self.tablets.len() + self.platforms.len()
    }

    /// First phone family that matches, in `DeviceType::ORDERED` order.
    pub fn device_type(&self, identifying: &str) -> DeviceType {
        for (device_type, sig) in &self.phones {
            if sig.is_match(identifying) {
                trace!(signature = %sig.name, "Phone signature matched");
                return *device_type;
            }
        }
        DeviceType::Unknown
    }

    /// Whether any tablet signature matches.
    pub fn is_tablet(&self, identifying: &str) -> bool {
        match first_match(&self.tablets, identifying) {
            Some(sig) => {
                trace!(signature = %sig.name, "Tablet signature matched");
                true
            }
            None => false,
        }
    }

    /// Whether any phone, tablet or platform signature matches.
    pub fn is_mobile(&self, identifying: &str) -> bool {
        self.device_type(identifying) != DeviceType::Unknown
            || self.is_tablet(identifying)
            || self.is_platform(identifying)
    }

    fn is_platform(&self, identifying: &str) -> bool {
        match first_match(&self.platforms, identifying) {
            Some(sig) => {
                trace!(signature = %sig.name, "Platform signature matched");
                true
            }
            None => false,
        }
    }

    /// Classify an identifying string.
    pub fn classify(&self, identifying: &str) -> ClassificationResult {
        let device_type = self.device_type(identifying);
        let tablet = self.is_tablet(identifying);

        // Tablet implies mobile-class but is reported as the more specific class.
        let class = if tablet {
            DeviceClass::Tablet
        } else if device_type != DeviceType::Unknown || self.is_platform(identifying) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        };

        ClassificationResult::new(class, device_type)
    }
}

impl Default for SignatureMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Detector for SignatureMatcher {
    fn detect(&self, identifying: &str) -> ClassificationResult {
        self.classify(identifying)
    }
}
