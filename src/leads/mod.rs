//! Lead extractor
//!
//! Recovers a business name, email, phone and street address from one page
//! through ordered lists of independent heuristics, and builds leads from
//! places-provider candidates when a business has no website to analyze.

mod extractors;
mod industry;

pub use extractors::{first_address, first_email, first_phone, normalize_phone};
pub use industry::Industry;

use crate::collaborators::PlaceCandidate;
use crate::compliance::{DataField, JurisdictionRuleSet};
use crate::crawler::{FetchedPage, PageDocument};
use extractors::{
    first_non_empty, ADDRESS_EXTRACTORS, EMAIL_EXTRACTORS, NAME_EXTRACTORS, PHONE_EXTRACTORS,
};
use serde::Serialize;
use url::Url;

/// Business contact details recovered for one page or place
///
/// Always has at least one populated contact field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLead {
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub source_url: String,
    pub industry: Option<Industry>,
}

impl ExtractedLead {
    /// Number of populated contact fields
    pub fn populated_fields(&self) -> usize {
        [
            &self.business_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.website,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }

    /// Drops every field the jurisdiction does not allow us to keep
    ///
    /// Returns `None` if nothing allowed remains.
    pub fn redact(mut self, rules: &JurisdictionRuleSet) -> Option<Self> {
        let fields = [
            (DataField::BusinessName, &mut self.business_name),
            (DataField::Email, &mut self.email),
            (DataField::Phone, &mut self.phone),
            (DataField::Address, &mut self.address),
            (DataField::Website, &mut self.website),
        ];
        for (field, value) in fields {
            if !rules.allows(field) {
                *value = None;
            }
        }

        (self.populated_fields() > 0).then_some(self)
    }
}

/// Extracts a lead from a fetched page
///
/// # Arguments
///
/// * `page` - The fetched page
///
/// # Returns
///
/// `None` when no field could be recovered
///
/// # Example
///
/// ```
/// use sumi_scout::leads::extract_from_document;
/// use sumi_scout::crawler::PageDocument;
/// use url::Url;
///
/// let doc = PageDocument::parse(
///     "<p>Call us at (555) 867-5309 or email info@clinic.example, 123 Main Street</p>",
/// );
/// let url = Url::parse("https://clinic.example/").unwrap();
/// let lead = extract_from_document(&doc, &url).unwrap();
/// assert_eq!(lead.phone.as_deref(), Some("(555) 867-5309"));
/// ```
pub fn extract(page: &FetchedPage) -> Option<ExtractedLead> {
    let doc = PageDocument::parse(&page.body);
    extract_from_document(&doc, &page.final_url)
}

/// Runs every field extractor over an already parsed document
pub fn extract_from_document(doc: &PageDocument, source_url: &Url) -> Option<ExtractedLead> {
    let business_name = first_non_empty(doc, NAME_EXTRACTORS);
    let lead = ExtractedLead {
        industry: business_name.as_deref().map(Industry::guess),
        business_name,
        email: first_non_empty(doc, EMAIL_EXTRACTORS),
        phone: first_non_empty(doc, PHONE_EXTRACTORS),
        address: first_non_empty(doc, ADDRESS_EXTRACTORS),
        website: None,
        source_url: source_url.to_string(),
    };

    if lead.populated_fields() == 0 {
        tracing::debug!("No lead fields recovered from {}", source_url);
        return None;
    }
    Some(lead)
}

/// Builds a lead straight from places data, without visiting the website
pub fn lead_from_place(place: &PlaceCandidate, source: &str) -> Option<ExtractedLead> {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let name = Some(place.name.trim().to_string()).filter(|n| !n.is_empty());

    let lead = ExtractedLead {
        industry: name.as_deref().map(Industry::guess),
        business_name: name,
        email: None,
        phone: non_empty(&place.phone).map(|p| normalize_phone(&p)),
        address: non_empty(&place.address),
        website: non_empty(&place.website),
        source_url: source.to_string(),
    };

    (lead.populated_fields() > 0).then_some(lead)
}
