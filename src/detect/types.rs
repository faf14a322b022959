//! Core types for device classification.

use std::fmt;

/// Coarse device category.
///
/// The numeric codes are the values stored in the `device` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }

    /// Numeric code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            DeviceClass::Mobile => 1,
            DeviceClass::Tablet => 2,
            DeviceClass::Desktop => 3,
        }
    }

    /// Inverse of [`DeviceClass::code`]. Zero and anything above 3 are rejected.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(DeviceClass::Mobile),
            2 => Some(DeviceClass::Tablet),
            3 => Some(DeviceClass::Desktop),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vendor or device family.
///
/// Variant order is the evaluation order of the phone signatures: when more
/// than one family matches, the earliest one here wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    IPhone,
    BlackBerry,
    Htc,
    Nexus,
    DellStreak,
    Motorola,
    Samsung,
    Sony,
    Asus,
    Palm,
    GenericPhone,
    Unknown,
}

impl DeviceType {
    /// Every recognised family in evaluation order. `Unknown` is not included.
    pub const ORDERED: [DeviceType; 11] = [
        DeviceType::IPhone,
        DeviceType::BlackBerry,
        DeviceType::Htc,
        DeviceType::Nexus,
        DeviceType::DellStreak,
        DeviceType::Motorola,
        DeviceType::Samsung,
        DeviceType::Sony,
        DeviceType::Asus,
        DeviceType::Palm,
        DeviceType::GenericPhone,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceType::IPhone => "iPhone",
            DeviceType::BlackBerry => "BlackBerry",
            DeviceType::Htc => "HTC",
            DeviceType::Nexus => "Nexus",
            DeviceType::DellStreak => "DellStreak",
            DeviceType::Motorola => "Motorola",
            DeviceType::Samsung => "Samsung",
            DeviceType::Sony => "Sony",
            DeviceType::Asus => "Asus",
            DeviceType::Palm => "Palm",
            DeviceType::GenericPhone => "GenericPhone",
            DeviceType::Unknown => "Unknown",
        }
    }

    /// Lowercase key stored in the `device_type` cookie and used by
    /// signature files. `Unknown` is stored as `"0"`.
    pub fn key(&self) -> &'static str {
        match self {
            DeviceType::IPhone => "iphone",
            DeviceType::BlackBerry => "blackberry",
            DeviceType::Htc => "htc",
            DeviceType::Nexus => "nexus",
            DeviceType::DellStreak => "dellstreak",
            DeviceType::Motorola => "motorola",
            DeviceType::Samsung => "samsung",
            DeviceType::Sony => "sony",
            DeviceType::Asus => "asus",
            DeviceType::Palm => "palm",
            DeviceType::GenericPhone => "genericphone",
            DeviceType::Unknown => "0",
        }
    }

    /// Parse a key (case-insensitive). `"0"` maps to `Unknown`.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.to_lowercase();
        if key == "0" {
            return Some(DeviceType::Unknown);
        }
        Self::ORDERED.into_iter().find(|t| t.key() == key)
    }

    /// Position in [`DeviceType::ORDERED`], `None` for `Unknown`.
    pub fn rank(&self) -> Option<usize> {
        Self::ORDERED.iter().position(|t| t == self)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classification of one identifying string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassificationResult {
    pub class: DeviceClass,
    pub device_type: DeviceType,
}

impl ClassificationResult {
    pub fn new(class: DeviceClass, device_type: DeviceType) -> Self {
        Self { class, device_type }
    }

    /// Result for a client with no mobile or tablet signal.
    pub fn desktop() -> Self {
        Self::new(DeviceClass::Desktop, DeviceType::Unknown)
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_codes() {
        assert_eq!(DeviceClass::Mobile.code(), 1);
        assert_eq!(DeviceClass::Tablet.code(), 2);
        assert_eq!(DeviceClass::Desktop.code(), 3);
        for class in [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop] {
            assert_eq!(DeviceClass::from_code(class.code()), Some(class));
        }
    }

    #[test]
    fn test_class_rejects_zero_and_out_of_range() {
        assert_eq!(DeviceClass::from_code(0), None);
        assert_eq!(DeviceClass::from_code(4), None);
        assert_eq!(DeviceClass::from_code(255), None);
    }

    #[test]
    fn test_type_keys() {
        assert_eq!(DeviceType::IPhone.key(), "iphone");
        assert_eq!(DeviceType::DellStreak.key(), "dellstreak");
        assert_eq!(DeviceType::Unknown.key(), "0");
        assert_eq!(DeviceType::from_key("BlackBerry"), Some(DeviceType::BlackBerry));
        assert_eq!(DeviceType::from_key("0"), Some(DeviceType::Unknown));
        assert_eq!(DeviceType::from_key("nokia"), None);
        assert_eq!(DeviceType::from_key("unknown"), None);
    }

    #[test]
    fn test_type_order() {
        assert_eq!(DeviceType::ORDERED[0], DeviceType::IPhone);
        assert_eq!(DeviceType::ORDERED[10], DeviceType::GenericPhone);
        assert_eq!(DeviceType::Samsung.rank(), Some(6));
        assert_eq!(DeviceType::Unknown.rank(), None);
    }

    #[test]
    fn test_default_result_is_desktop() {
        let result = ClassificationResult::default();
        assert_eq!(result.class, DeviceClass::Desktop);
        assert_eq!(result.device_type, DeviceType::Unknown);
    }
}
