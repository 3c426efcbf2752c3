//! Locator abstraction for element selection.
//!
//! A locator pairs a selector expression with a zero-based occurrence index,
//! so that "the 3rd element matching `.product-card`" is a first-class value
//! rather than a detail of selector syntax. Recorded sessions routinely reuse
//! one selector for many elements, and the index is what disambiguates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A locator for finding one element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Selector expression (CSS selector, `#id`, `.class`, attribute selector)
    selector: String,
    /// Zero-based occurrence index; `None` means the first match
    index: Option<usize>,
}

impl Locator {
    /// Create a locator for the first element matching `selector`.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: None,
        }
    }

    /// Select the i-th match (zero-based) instead of the first.
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// The selector expression.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The occurrence index, if one was set.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// The occurrence index to use when querying (first match by default).
    #[must_use]
    pub fn effective_index(&self) -> usize {
        self.index.unwrap_or(0)
    }

    /// JavaScript expression resolving to the target element (or `undefined`).
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "document.querySelectorAll({:?})[{}]",
            self.selector,
            self.effective_index()
        )
    }

    /// JavaScript expression counting all matches for this selector.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("document.querySelectorAll({:?}).length", self.selector)
    }

    /// JavaScript expression resolving to `true` when the target element is
    /// attached and has a non-empty bounding box.
    #[must_use]
    pub fn to_visible_query(&self) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             const r = el.getBoundingClientRect(); \
             return r.width > 0 && r.height > 0; }})()",
            self.to_query()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}:nth({i})", self.selector),
            None => write!(f, "{}", self.selector),
        }
    }
}

/// Reject selectors that cannot possibly resolve: leading/trailing
/// combinator or brace noise, raw HTML brackets, dangling `>` combinators.
/// Recorded sessions occasionally capture these and they must be caught
/// before a run starts.
#[must_use]
pub fn is_well_formed(selector: &str) -> bool {
    if selector.trim().is_empty() {
        return false;
    }

    let malformed = [
        r"^[{}()>]",
        r"[{}()>]$",
        r"[<>]",
        r"^[a-zA-Z]+\s*>\s*$",
    ];

    for pattern in malformed {
        // Patterns are literals; compilation cannot fail.
        if let Ok(re) = regex::Regex::new(pattern) {
            if re.is_match(selector) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_query() {
        let loc = Locator::new("#add-to-cart");
        assert_eq!(loc.to_query(), "document.querySelectorAll(\"#add-to-cart\")[0]");
        assert_eq!(loc.effective_index(), 0);
    }

    #[test]
    fn test_nth_match_query() {
        let loc = Locator::new(".product-card").nth(2);
        assert_eq!(
            loc.to_query(),
            "document.querySelectorAll(\".product-card\")[2]"
        );
        assert_eq!(loc.index(), Some(2));
    }

    #[test]
    fn test_count_query() {
        let loc = Locator::new(".product-card");
        assert_eq!(
            loc.to_count_query(),
            "document.querySelectorAll(\".product-card\").length"
        );
    }

    #[test]
    fn test_visible_query_contains_bounding_box_check() {
        let loc = Locator::new("input[name=q]");
        let query = loc.to_visible_query();
        assert!(query.contains("getBoundingClientRect"));
        assert!(query.contains("document.querySelectorAll(\"input[name=q]\")[0]"));
    }

    #[test]
    fn test_query_escapes_quotes() {
        let loc = Locator::new("a[title=\"Next page\"]");
        assert!(loc.to_query().contains("\\\""));
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::new("#a").to_string(), "#a");
        assert_eq!(Locator::new(".b").nth(3).to_string(), ".b:nth(3)");
    }

    #[test]
    fn test_well_formed_selectors() {
        assert!(is_well_formed("#checkout-button"));
        assert!(is_well_formed(".cart-item"));
        assert!(is_well_formed("input[name=\"email\"]"));
        assert!(is_well_formed("div.results li a"));
    }

    #[test]
    fn test_malformed_selectors_rejected() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("   "));
        assert!(!is_well_formed("{bad"));
        assert!(!is_well_formed("bad)"));
        assert!(!is_well_formed("<div>"));
        assert!(!is_well_formed("div > "));
    }
}
