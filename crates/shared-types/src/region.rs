//! # Region Value Objects
//!
//! Region codes, epochs, partition ids and the property identifier format.

use crate::errors::RegistryError;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum region code length.
pub const MIN_REGION_CODE_LEN: usize = 2;

/// Maximum region code length.
pub const MAX_REGION_CODE_LEN: usize = 3;

/// Prefix of every issued identifier.
pub const IDENTIFIER_AUTHORITY: &str = "AUTHORITY";

/// Zero-padded width of the sequence component of an identifier.
pub const IDENTIFIER_SEQUENCE_WIDTH: usize = 6;

/// Digits in the epoch segment of an identifier.
pub const IDENTIFIER_EPOCH_WIDTH: usize = 4;

/// Known display names and their codes. Lookup is case-insensitive.
const REGION_NAMES: &[(&str, &str)] = &[
    ("Telangana", "TS"),
    ("Andhra Pradesh", "AP"),
    ("Karnataka", "KA"),
    ("Tamil Nadu", "TN"),
    ("Maharashtra", "MH"),
    ("Uttar Pradesh", "UP"),
    ("Uttarakhand", "UK"),
    ("Himachal Pradesh", "HP"),
    ("Punjab", "PB"),
    ("Haryana", "HR"),
    ("Delhi", "DL"),
    ("Rajasthan", "RJ"),
    ("Goa", "GA"),
    ("West Bengal", "WB"),
    ("Odisha", "OD"),
    ("Jharkhand", "JH"),
    ("Bihar", "BR"),
    ("Madhya Pradesh", "MP"),
    ("Chhattisgarh", "CT"),
    ("Assam", "AS"),
    ("Manipur", "MN"),
    ("Meghalaya", "ML"),
    ("Mizoram", "MZ"),
    ("Nagaland", "NL"),
    ("Tripura", "TR"),
    ("Arunachal Pradesh", "AR"),
    ("Sikkim", "SK"),
    ("Kerala", "KL"),
    ("Puducherry", "PY"),
    ("Ladakh", "LA"),
    ("Jammu & Kashmir", "JK"),
    ("Jammu and Kashmir", "JK"),
];

/// Administrative region code, always upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    /// Parse a region code or a known display name.
    ///
    /// Display names win over codes, so `"goa"` is `GA`.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let trimmed = raw.trim();
        if let Some((_, code)) = REGION_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self((*code).to_string()));
        }

        let len = trimmed.len();
        if !(MIN_REGION_CODE_LEN..=MAX_REGION_CODE_LEN).contains(&len) {
            return Err(RegistryError::InvalidRegionCode {
                code: raw.to_string(),
                reason: format!(
                    "expected {MIN_REGION_CODE_LEN}-{MAX_REGION_CODE_LEN} letters or a known region name"
                ),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RegistryError::InvalidRegionCode {
                code: raw.to_string(),
                reason: "only ASCII letters allowed".to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First known display name for this code.
    pub fn display_name(&self) -> Option<&'static str> {
        REGION_NAMES
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegionCode {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegionCode {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

/// Calendar year scoping a sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Epoch(pub u32);

impl Epoch {
    /// Epoch containing `at`.
    pub fn of(at: DateTime<Utc>) -> Self {
        Self(at.year().max(0) as u32)
    }

    /// Numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an independently maintained ledger partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(String);

impl PartitionId {
    /// Arbitrary partition name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The central authority partition.
    pub fn authority() -> Self {
        Self("authority-global".to_string())
    }

    /// Conventional partition name for a region, e.g. `state-ts`.
    pub fn for_region(region: &RegionCode) -> Self {
        Self(format!("state-{}", region.as_str().to_ascii_lowercase()))
    }

    /// Name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed form of `AUTHORITY-<epoch>-<region>-<sequence>`.
///
/// The rendered string is a hard external contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyIdentifier {
    /// Issue epoch
    pub epoch: Epoch,
    /// Issuing region
    pub region: RegionCode,
    /// Sequence within (region, epoch)
    pub sequence: u64,
}

impl PropertyIdentifier {
    /// Build from parts.
    pub fn new(epoch: Epoch, region: RegionCode, sequence: u64) -> Self {
        Self {
            epoch,
            region,
            sequence,
        }
    }

    /// Parse a rendered identifier.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let malformed = |reason: &str| RegistryError::invalid("identifier", format!("{raw:?}: {reason}"));

        let mut parts = raw.split('-');
        let (Some(authority), Some(epoch), Some(region), Some(sequence), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(malformed("expected AUTHORITY-<epoch>-<region>-<sequence>"));
        };

        if authority != IDENTIFIER_AUTHORITY {
            return Err(malformed("unknown authority prefix"));
        }
        if epoch.len() != IDENTIFIER_EPOCH_WIDTH || !epoch.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("epoch must be a four-digit year"));
        }
        let epoch = epoch
            .parse::<u32>()
            .map_err(|_| malformed("epoch is not a number"))?;
        if region.len() < MIN_REGION_CODE_LEN
            || region.len() > MAX_REGION_CODE_LEN
            || !region.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(malformed("region must be upper-case letters"));
        }
        if sequence.len() != IDENTIFIER_SEQUENCE_WIDTH || !sequence.chars().all(|c| c.is_ascii_digit())
        {
            return Err(malformed("sequence must be exactly six zero-padded digits"));
        }
        let sequence = sequence
            .parse::<u64>()
            .map_err(|_| malformed("sequence out of range"))?;

        Ok(Self {
            epoch: Epoch(epoch),
            region: RegionCode(region.to_string()),
            sequence,
        })
    }
}

impl fmt::Display for PropertyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{:0width$}",
            IDENTIFIER_AUTHORITY,
            self.epoch,
            self.region,
            self.sequence,
            width = IDENTIFIER_SEQUENCE_WIDTH
        )
    }
}
