//! Signature data.
//!
//! A [`SignatureSet`] is plain data: a version tag plus three ordered lists of
//! named patterns. The built-in set covers the common phone families, tablets
//! and mobile platforms; a replacement can be loaded from JSON without
//! rebuilding.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::DeviceType;
use crate::Error;

/// Version tag of [`SignatureSet::builtin`].
pub const BUILTIN_VERSION: &str = "builtin-1";

/// One named pattern.
///
/// Patterns are matched case-insensitively. `unless` vetoes a match, which
/// stands in for negative look-ahead (`Android` without `Mobile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless: Option<String>,
}

impl Signature {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            unless: None,
        }
    }

    pub fn unless(mut self, pattern: impl Into<String>) -> Self {
        self.unless = Some(pattern.into());
        self
    }
}

/// Versioned signature table.
///
/// `phones` are named by [`DeviceType::key`] and decide the device type.
/// `tablets` decide the tablet class. Any match in any of the three lists
/// marks the client as mobile-class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    pub version: String,
    #[serde(default)]
    pub phones: Vec<Signature>,
    #[serde(default)]
    pub tablets: Vec<Signature>,
    #[serde(default)]
    pub platforms: Vec<Signature>,
}

impl SignatureSet {
    /// Parse a signature set from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let set: SignatureSet = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }

    /// Read and parse a JSON signature file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every phone signature names a known device type.
    pub fn validate(&self) -> Result<(), Error> {
        for sig in &self.phones {
            match DeviceType::from_key(&sig.name) {
                Some(DeviceType::Unknown) | None => {
                    return Err(Error::UnknownDeviceType(sig.name.clone()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Total number of signatures across all lists.
    pub fn len(&self) -> usize {
        self.phones.len() + self.tablets.len() + self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_VERSION.to_string(),
            phones: to_signatures(PHONES),
            tablets: to_signatures(TABLETS),
            platforms: to_signatures(PLATFORMS),
        }
    }
}

impl Default for SignatureSet {
    fn default() -> Self {
        Self::builtin()
    }
}

type Row = (&'static str, &'static str, Option<&'static str>);

fn to_signatures(rows: &[Row]) -> Vec<Signature> {
    rows.iter()
        .map(|&(name, pattern, unless)| Signature {
            name: name.to_string(),
            pattern: pattern.to_string(),
            unless: unless.map(str::to_string),
        })
        .collect()
}

// Phone families, keyed by DeviceType::key.
const PHONES: &[Row] = &[
    ("iphone", r"\biPhone\b|\biPod\b", None),
    (
        "blackberry",
        r"BlackBerry|\bBB10\b|\brim[0-9]+|\b(BBA100|BBB100|BBD100|BBE100|BBF100|STH100)\b-[0-9]+",
        None,
    ),
    (
        "htc",
        r"HTC|APX515CKT|Qtek9090|APA9292KT|HD_mini|Sensation.*Z710e|PG86100|Z715e|Desire.*(A8181|HD)|ADR6200|ADR6400L|ADR6425|001HT|Inspire 4G|Android.*\bEVO\b|T-Mobile G1|Z520m",
        None,
    ),
    (
        "nexus",
        r"Nexus One|Nexus S|Galaxy.*Nexus|Android.*Nexus.*Mobile|Nexus 4|Nexus 5|Nexus 6",
        None,
    ),
    (
        "dellstreak",
        r"Dell[;]? (Streak|Aero|Venue|Venue Pro|Flash|Smoke|Mini 3iX)|XCD28|XCD35|\b001DL\b|\b101DL\b|\bGS01\b",
        None,
    ),
    (
        "motorola",
        r"Motorola|DROIDX|DROID BIONIC|\bDroid\b.*Build|Android.*Xoom|HRI39|MOT-|\bMB[0-9]{3}\b|\bME[0-9]{3}\b|\bXT[0-9]{3,4}\b|\bMoto [EGXZ]\b",
        None,
    ),
    (
        "samsung",
        r"\bSamsung\b|SGH-[A-Z0-9]+|GT-[ISNBCE][0-9]{4}|SCH-[A-Z0-9]+|SPH-[A-Z0-9]+|SHV-E[0-9]+|SM-[AGJNSFEM][0-9]{3}",
        None,
    ),
    (
        "sony",
        r"SonyST|SonyLT|SonyEricsson|LT18i|E10i|LT28h|LT26w|C5303|C6902|C6903|C6906|C6943|D2533|SOV34|601SO|F8332",
        None,
    ),
    ("asus", r"Asus.*Galaxy|PadFone.*Mobile", None),
    ("palm", r"PalmSource|Palm", None),
    (
        "genericphone",
        r"Tapatalk|PDA;|SAGEM|\bmmp\b|pocket|\bpsp\b|symbian|Smartphone|smartfon|treo|up\.browser|up\.link|vodafone|\bwap\b|nokia|Series40|Series60|S60|SonyEricsson|N900|MAUI.*WAP.*Browser",
        None,
    ),
];

const TABLETS: &[Row] = &[
    ("iPad", r"\biPad\b", None),
    ("NexusTablet", r"Android.*Nexus\s+(7|9|10)\b", None),
    (
        "SamsungTablet",
        r"SAMSUNG.*Tablet|Galaxy.*Tab|SC-01C|GT-P[0-9]{4}|SM-T[0-9]{3}|SM-P[0-9]{3}|SM-X[0-9]{3}",
        None,
    ),
    (
        "Kindle",
        r"Kindle|Silk.*Accelerated|Android.*\b(KFOT|KFTT|KFJWI|KFJWA|KFOTE|KFSOWI|KFTHWI|KFTHWA|KFAPWI|KFAPWA|KFSAWA|KFSAWI|KFASWI|KFARWI|KFFOWI|KFGIWI|KFMEWI)\b",
        None,
    ),
    ("SurfaceTablet", r"Windows NT [0-9.]+; ARM;.*(Tablet|ARMBJS)", None),
    ("GenericTablet", r"\bTablet\b", Some(r"Tablet PC")),
    ("AndroidTablet", r"\bAndroid\b", Some(r"Mobile|Opera Mini")),
];

// Mobile operating systems and browsers.
const PLATFORMS: &[Row] = &[
    ("AndroidOS", r"\bAndroid\b", None),
    ("BlackBerryOS", r"BlackBerry|\bBB10\b|rim tablet os", None),
    ("PalmOS", r"PalmOS|avantgo|blazer|hiptop|plucker|\bPalm\b", None),
    ("SymbianOS", r"Symbian|SymbOS|Series60|Series40|SYB-[0-9]+|\bS60\b", None),
    (
        "WindowsMobileOS",
        r"Windows CE.*(PPC|Smartphone|Mobile|[0-9]{3}x[0-9]{3})|Windows Mobile|Windows Phone [0-9.]+|WCE;",
        None,
    ),
    (
        "WindowsPhoneOS",
        r"Windows Phone 10\.0|Windows Phone 8\.1|Windows Phone 8\.0|Windows Phone OS|XBLWP7|ZuneWP7|Windows NT 6\.[23]; ARM;",
        None,
    ),
    ("iOS", r"\biPhone.*Mobile|\biPod|\biPad|AppleCoreMedia", None),
    ("webOS", r"webOS|hpwOS", None),
    ("bada", r"\bBada\b", None),
    (
        "MobileBrowser",
        r"Mobile Safari|Opera Mini|Opera Mobi|IEMobile|Fennec|Minimo|NetFront|UCBrowser|UCWEB|\(Mobile;|Mobile/[0-9A-Z]+",
        None,
    ),
];
