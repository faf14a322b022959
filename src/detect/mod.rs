//! Signature matching.
//!
//! [`SignatureMatcher`] turns an identifying string (a user-agent) into a
//! [`ClassificationResult`]: a coarse [`DeviceClass`] plus the first matching
//! [`DeviceType`] in a fixed order. Classification is total: empty or
//! unrecognised input yields desktop/unknown.
//!
//! # Example
//!
//! ```
//! use device_detect::detect::{DeviceClass, DeviceType, SignatureMatcher};
//!
//! let matcher = SignatureMatcher::builtin();
//! let result = matcher.classify(
//!     "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148 Safari/604.1",
//! );
//! assert_eq!(result.class, DeviceClass::Mobile);
//! assert_eq!(result.device_type, DeviceType::IPhone);
//! ```

mod matcher;
mod signatures;
mod types;


pub use matcher::{Detector, SignatureMatcher};
pub use signatures::{Signature, SignatureSet, BUILTIN_VERSION};
pub use types::{ClassificationResult, DeviceClass, DeviceType};
