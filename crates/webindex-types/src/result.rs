//! Display-ready search results.
//!
//! The index service appends a fixed-length, non-display suffix (a rank/score
//! encoding) to every URL it returns. Its length is part of the service
//! contract and is configured through `Settings::result_suffix_len`.

use serde::{Deserialize, Serialize};

/// Suffix length used by the index service unless configured otherwise.
pub const DEFAULT_SUFFIX_LEN: usize = 10;

/// Scheme prepended to every display URL to form the link target.
pub const HREF_SCHEME: &str = "http://";

/// One rendered search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// URL without the service suffix
    pub display_url: String,
    /// Link target, always `HREF_SCHEME + display_url`
    pub href: String,
}

impl SearchResultItem {
    /// Build an item from a raw, suffix-decorated value.
    ///
    /// Values shorter than `suffix_len` clamp to an empty display URL.
    /// Length is counted in chars so multibyte values never split.
    pub fn from_raw(raw: &str, suffix_len: usize) -> Self {
        let keep = raw.chars().count().saturating_sub(suffix_len);
        let display_url: String = raw.chars().take(keep).collect();
        Self::new(display_url)
    }

    /// Build an item from an already stripped display URL.
    pub fn new(display_url: impl Into<String>) -> Self {
        let display_url = display_url.into();
        let href = format!("{HREF_SCHEME}{display_url}");
        Self { display_url, href }
    }

    /// True when the raw value was too short to carry the suffix.
    pub fn is_truncated_away(&self) -> bool {
        self.display_url.is_empty()
    }

    /// Anchor label; the link text shows the full href.
    pub fn label(&self) -> &str {
        &self.href
    }
}
