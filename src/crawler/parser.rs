//! Parsed HTML document shared by the analyzer, lead extractor and discoverer
//!
//! `PageDocument` owns a `scraper::Html`, which is not `Send`. Parse, query,
//! and drop it inside one synchronous block; never hold it across an `.await`.

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

/// Elements whose text never reaches the reader
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// An anchor found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The raw `href` attribute
    pub href: String,
    /// Whitespace-collapsed anchor text (may be empty)
    pub text: String,
}

/// A heading element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    pub text: String,
}

/// One parsed HTML page with the queries the rest of the crate needs
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Parses an HTML document; html5ever recovers from any malformed input
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Trimmed `<title>` text, if present and non-empty
    pub fn title(&self) -> Option<String> {
        self.select("title")
            .into_iter()
            .next()
            .map(|e| collapse_whitespace(&e.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    /// Content of `<meta name="...">`, matching the name case-insensitively
    pub fn meta_named(&self, name: &str) -> Option<String> {
        self.meta_content("name", name)
    }

    /// Content of `<meta property="...">` (Open Graph tags)
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.meta_content("property", property)
    }

    fn meta_content(&self, attr: &str, key: &str) -> Option<String> {
        self.select("meta")
            .into_iter()
            .filter(|e| {
                e.value()
                    .attr(attr)
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
            .find_map(|e| e.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }

    /// All headings in document order
    pub fn headings(&self) -> Vec<Heading> {
        self.select("h1, h2, h3, h4, h5, h6")
            .into_iter()
            .filter_map(|e| {
                let level = e.value().name().strip_prefix('h')?.parse().ok()?;
                Some(Heading {
                    level,
                    text: collapse_whitespace(&e.text().collect::<String>()),
                })
            })
            .collect()
    }

    /// All `<a href>` elements in document order
    pub fn anchors(&self) -> Vec<Anchor> {
        self.select("a[href]")
            .into_iter()
            .filter_map(|e| {
                Some(Anchor {
                    href: e.value().attr("href")?.to_string(),
                    text: collapse_whitespace(&e.text().collect::<String>()),
                })
            })
            .collect()
    }

    /// Number of `<img>` elements without non-empty alt text
    pub fn images_missing_alt(&self) -> usize {
        self.select("img")
            .into_iter()
            .filter(|e| e.value().attr("alt").map_or(true, |a| a.trim().is_empty()))
            .count()
    }

    /// Text a reader would see in the body, whitespace-collapsed
    pub fn visible_text(&self) -> String {
        let root = self
            .select("body")
            .into_iter()
            .next()
            .unwrap_or_else(|| self.html.root_element());

        let mut parts = Vec::new();
        for node in root.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                matches!(a.value(), Node::Element(e) if INVISIBLE_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
        }

        collapse_whitespace(&parts.join(" "))
    }

    /// Number of whitespace-separated words in the visible text
    pub fn word_count(&self) -> usize {
        self.visible_text().split_whitespace().count()
    }

    /// True if the page carries JSON-LD or schema.org microdata
    pub fn has_structured_data(&self) -> bool {
        let json_ld = self.select("script[type]").into_iter().any(|e| {
            e.value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
        });
        json_ld
            || self.select("[itemtype]").into_iter().any(|e| {
                e.value()
                    .attr("itemtype")
                    .is_some_and(|t| t.contains("schema.org"))
            })
    }

    /// The `lang` attribute of `<html>`, if declared
    pub fn html_lang(&self) -> Option<String> {
        self.html
            .root_element()
            .value()
            .attr("lang")
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
    }

    /// Form controls a screen reader cannot name
    ///
    /// A control counts as labeled through `aria-label`, `aria-labelledby`,
    /// `title`, a `<label for>` pointing at its id, an enclosing `<label>`, or
    /// (for buttons) its own text or value.
    pub fn unlabeled_controls(&self) -> usize {
        let label_targets: HashSet<String> = self
            .select("label[for]")
            .into_iter()
            .filter_map(|l| l.value().attr("for").map(|f| f.trim().to_string()))
            .collect();

        self.select("input, select, textarea, button")
            .into_iter()
            .filter(|control| {
                let el = control.value();
                let input_type = el.attr("type").unwrap_or("").to_ascii_lowercase();
                if el.name() == "input" && input_type == "hidden" {
                    return false;
                }

                let has_attr = |name: &str| el.attr(name).is_some_and(|v| !v.trim().is_empty());
                let labeled = has_attr("aria-label")
                    || has_attr("aria-labelledby")
                    || has_attr("title")
                    || el
                        .attr("id")
                        .is_some_and(|id| label_targets.contains(id.trim()))
                    || control.ancestors().any(|a| {
                        matches!(a.value(), Node::Element(e) if e.name() == "label")
                    })
                    || (el.name() == "button"
                        && !control.text().collect::<String>().trim().is_empty())
                    || (el.name() == "input"
                        && matches!(input_type.as_str(), "submit" | "reset" | "button")
                        && has_attr("value"));

                !labeled
            })
            .count()
    }

    /// Runs a CSS selector, yielding nothing if the selector is invalid
    fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
