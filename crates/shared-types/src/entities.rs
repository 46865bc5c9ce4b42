//! # Shared Entities
//!
//! Property attributes carried from a region's draft into its bound record
//! and into the notifications the relay consumes.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Descriptive attributes of a land parcel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttributes {
    /// Survey reference, e.g. `123/A`
    pub survey_no: String,
    /// District
    pub district: String,
    /// Mandal (sub-district)
    pub mandal: String,
    /// Village
    pub village: String,
    /// Area, free-form with unit
    pub area: String,
    /// Land use classification
    pub land_type: String,
    /// Declared valuation
    pub market_value: String,
}

impl PropertyAttributes {
    /// Location fields must be present; the rest are optional.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (field, value) in [
            ("surveyNo", &self.survey_no),
            ("district", &self.district),
            ("mandal", &self.mandal),
            ("village", &self.village),
        ] {
            if value.trim().is_empty() {
                return Err(RegistryError::invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }

    /// Case-insensitive, whitespace-trimmed location match.
    pub fn matches_location(&self, district: &str, mandal: &str, village: &str, survey_no: &str) -> bool {
        fn eq(a: &str, b: &str) -> bool {
            a.trim().eq_ignore_ascii_case(b.trim())
        }
        eq(&self.district, district)
            && eq(&self.mandal, mandal)
            && eq(&self.village, village)
            && eq(&self.survey_no, survey_no)
    }
}

/// Resolution of an ownership transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDecision {
    /// Owner changes.
    Approved,
    /// Owner unchanged.
    Rejected,
    /// Owner unchanged, awaiting a later decision.
    Pending,
}

impl TransferDecision {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for TransferDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferDecision {
    type Err = RegistryError;

    /// Case-insensitive; anything outside the fixed set is rejected, never
    /// defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "pending" => Ok(Self::Pending),
            _ => Err(RegistryError::InvalidDecision {
                decision: s.to_string(),
            }),
        }
    }
}

/// Outcome of a cross-partition verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Binding confirmed by the authority.
    Verified,
    /// Binding refused by the authority.
    Rejected,
    /// No outcome yet.
    Pending,
}

impl VerificationStatus {
    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
            Self::Pending => "PENDING",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
