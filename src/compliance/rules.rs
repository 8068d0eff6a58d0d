//! Jurisdiction rule book
//!
//! Read-only reference data loaded once at start-up: the built-in rule sets
//! plus any `[[jurisdiction]]` overrides from the config file.

use crate::config::JurisdictionEntry;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Code of the fallback rule set used for unknown jurisdictions
pub const DEFAULT_JURISDICTION: &str = "DEFAULT";

/// A kind of business data a jurisdiction may allow us to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataField {
    BusinessName,
    Address,
    Phone,
    Website,
    Email,
}

impl DataField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessName => "business-name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Website => "website",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "business-name" => Ok(Self::BusinessName),
            "address" => Ok(Self::Address),
            "phone" => Ok(Self::Phone),
            "website" => Ok(Self::Website),
            "email" => Ok(Self::Email),
            other => Err(format!("unknown data field: {}", other)),
        }
    }
}

/// Rules that apply to scraping within one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JurisdictionRuleSet {
    pub code: String,
    pub requires_consent: bool,
    pub max_requests_per_day: u32,
    pub allowed_data_fields: Vec<DataField>,
    pub restriction_notes: Vec<String>,
}

impl JurisdictionRuleSet {
    fn new(
        code: &str,
        requires_consent: bool,
        max_requests_per_day: u32,
        allowed_data_fields: &[DataField],
        restriction_notes: &[&str],
    ) -> Self {
        Self {
            code: code.to_string(),
            requires_consent,
            max_requests_per_day,
            allowed_data_fields: allowed_data_fields.to_vec(),
            restriction_notes: restriction_notes.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn allows(&self, field: DataField) -> bool {
        self.allowed_data_fields.contains(&field)
    }
}

impl From<&JurisdictionEntry> for JurisdictionRuleSet {
    fn from(entry: &JurisdictionEntry) -> Self {
        Self {
            code: entry.code.trim().to_uppercase(),
            requires_consent: entry.requires_consent,
            max_requests_per_day: entry.max_requests_per_day,
            // Unknown names are rejected by config validation
            allowed_data_fields: entry
                .allowed_data_fields
                .iter()
                .filter_map(|f| f.parse().ok())
                .collect(),
            restriction_notes: entry.restriction_notes.clone(),
        }
    }
}

/// Jurisdiction code to rule set, with a conservative fallback
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: HashMap<String, JurisdictionRuleSet>,
    fallback: JurisdictionRuleSet,
}

impl RuleBook {
    /// The rule sets shipped with the crate
    pub fn builtin() -> Self {
        use DataField::*;

        let rules = [
            JurisdictionRuleSet::new(
                "CA",
                true,
                100,
                &[BusinessName, Address, Phone, Website],
                &[
                    "No personal emails without consent",
                    "No social media profiles",
                ],
            ),
            JurisdictionRuleSet::new(
                "NY",
                false,
                200,
                &[BusinessName, Address, Phone, Website, Email],
                &["No personal information beyond business contact"],
            ),
            JurisdictionRuleSet::new(
                "TX",
                false,
                150,
                &[BusinessName, Address, Phone, Website],
                &["No automated data collection without notice"],
            ),
            JurisdictionRuleSet::new(
                "FL",
                true,
                100,
                &[BusinessName, Address, Phone],
                &["No email collection without explicit consent"],
            ),
        ];

        Self {
            rules: rules.into_iter().map(|r| (r.code.clone(), r)).collect(),
            fallback: JurisdictionRuleSet::new(
                DEFAULT_JURISDICTION,
                false,
                100,
                &[BusinessName, Address, Phone, Website],
                &[
                    "Follow robots.txt",
                    "Respect rate limits",
                    "No personal data",
                ],
            ),
        }
    }

    /// The built-in rules with config entries layered on top
    pub fn with_overrides(entries: &[JurisdictionEntry]) -> Self {
        let mut book = Self::builtin();
        for entry in entries {
            let rules = JurisdictionRuleSet::from(entry);
            if rules.code == DEFAULT_JURISDICTION {
                book.fallback = rules;
            } else {
                book.rules.insert(rules.code.clone(), rules);
            }
        }
        book
    }

    /// Looks up the rules for a jurisdiction code (case-insensitive)
    ///
    /// Unknown codes fall back to the default rule set instead of failing.
    pub fn lookup(&self, code: &str) -> &JurisdictionRuleSet {
        self.rules
            .get(&code.trim().to_uppercase())
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &JurisdictionRuleSet {
        &self.fallback
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::builtin()
    }
}
