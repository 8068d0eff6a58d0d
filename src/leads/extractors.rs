//! Field extractors
//!
//! Each field has an ordered list of independent extractors over one parsed
//! document. The first extractor that returns a value wins.

use crate::crawler::PageDocument;
use regex::Regex;
use std::sync::LazyLock;

type FieldExtractor = fn(&PageDocument) -> Option<String>;

pub(crate) const NAME_EXTRACTORS: &[FieldExtractor] = &[name_from_h1, name_from_title];
pub(crate) const EMAIL_EXTRACTORS: &[FieldExtractor] = &[email_from_text, email_from_mailto];
pub(crate) const PHONE_EXTRACTORS: &[FieldExtractor] = &[phone_from_text, phone_from_tel_link];
pub(crate) const ADDRESS_EXTRACTORS: &[FieldExtractor] = &[address_from_text];

/// Generic or placeholder addresses that never belong to a real contact
const EMAIL_DENYLIST: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "example.com",
    "test.com",
    "placeholder",
    "yourdomain",
];

/// Asset suffixes that look like email domains in srcset-style strings ("logo@2x.png")
const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").ok());

/// North-American phone shapes, most specific first
static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static ADDRESS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+\s+(?:[a-z]+\.?\s+){1,5}?(?:street|st|avenue|ave|road|rd|drive|dr|lane|ln|boulevard|blvd)\b\.?",
    )
    .ok()
});

/// Runs extractors in order and returns the first non-empty value
pub(crate) fn first_non_empty(doc: &PageDocument, extractors: &[FieldExtractor]) -> Option<String> {
    extractors
        .iter()
        .filter_map(|extract| extract(doc))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub(crate) fn name_from_h1(doc: &PageDocument) -> Option<String> {
    doc.headings()
        .into_iter()
        .filter(|h| h.level == 1)
        .map(|h| h.text)
        .find(|text| !text.is_empty())
}

/// The part of the title before the first `|` or ` - ` separator
///
/// A hyphen inside a word ("Smith-Jones Dental") is not a separator.
pub(crate) fn name_from_title(doc: &PageDocument) -> Option<String> {
    let title = doc.title()?;
    let cut = title.find('|').into_iter().chain(separator_hyphen(&title)).min();
    let name = match cut {
        Some(index) => &title[..index],
        None => title.as_str(),
    };
    Some(name.trim().to_string()).filter(|n| !n.is_empty())
}

fn separator_hyphen(title: &str) -> Option<usize> {
    title.char_indices().find_map(|(i, c)| {
        let is_dash = matches!(c, '-' | '–' | '—');
        let before = title[..i].chars().next_back();
        let after = title[i + c.len_utf8()..].chars().next();
        let spaced =
            before.map_or(true, char::is_whitespace) || after.map_or(true, char::is_whitespace);
        (is_dash && spaced).then_some(i)
    })
}

pub(crate) fn email_from_text(doc: &PageDocument) -> Option<String> {
    first_email(&doc.visible_text())
}

pub(crate) fn email_from_mailto(doc: &PageDocument) -> Option<String> {
    doc.anchors().iter().find_map(|a| {
        let href = a.href.trim();
        let address = href
            .get(..7)
            .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
            .map(|_| &href[7..])?;
        first_email(address.split('?').next().unwrap_or_default())
    })
}

/// First email-shaped token that is not a generic or placeholder address
pub fn first_email(text: &str) -> Option<String> {
    let pattern = EMAIL_PATTERN.as_ref()?;
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .find(|email| {
            let lowered = email.to_lowercase();
            !EMAIL_DENYLIST.iter().any(|d| lowered.contains(d))
                && !ASSET_SUFFIXES.iter().any(|s| lowered.ends_with(s))
        })
}

pub(crate) fn phone_from_text(doc: &PageDocument) -> Option<String> {
    first_phone(&doc.visible_text())
}

pub(crate) fn phone_from_tel_link(doc: &PageDocument) -> Option<String> {
    doc.anchors().iter().find_map(|a| {
        let href = a.href.trim();
        let number = href
            .get(..4)
            .filter(|scheme| scheme.eq_ignore_ascii_case("tel:"))
            .map(|_| &href[4..])?;
        first_phone(number)
    })
}

/// First phone-shaped token, normalized
///
/// Patterns are tried in order; within a pattern the leftmost match that is not
/// part of a longer digit run wins.
pub fn first_phone(text: &str) -> Option<String> {
    PHONE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .find_iter(text)
            .find(|m| {
                let before = text[..m.start()].chars().next_back();
                let after = text[m.end()..].chars().next();
                !before.is_some_and(|c| c.is_ascii_digit())
                    && !after.is_some_and(|c| c.is_ascii_digit())
            })
            .map(|m| normalize_phone(m.as_str()))
    })
}

/// Formats 10 digits (or 11 with a leading 1) as `(AAA) BBB-CCCC`
///
/// Anything else is returned trimmed but otherwise untouched.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        10 => Some(digits.as_str()),
        11 if digits.starts_with('1') => Some(&digits[1..]),
        _ => None,
    };

    match national {
        Some(d) => format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..]),
        None => raw.trim().to_string(),
    }
}

pub(crate) fn address_from_text(doc: &PageDocument) -> Option<String> {
    first_address(&doc.visible_text())
}

/// First `<number> <words> <street-type>` substring
pub fn first_address(text: &str) -> Option<String> {
    ADDRESS_PATTERN
        .as_ref()?
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}
