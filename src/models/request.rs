//! Lookup request models.

/// Minimum length of a trimmed free-text query worth searching.
pub const MIN_QUERY_LEN: usize = 5;

/// A request for a citation lookup.
///
/// Either a direct link to a search-results page for the target paper, or a
/// free-text query to be encoded into the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    /// Fetch this results-page URL verbatim.
    DirectLink { url: String },
    /// Search for this text.
    FreeTextQuery { text: String },
}

impl LookupRequest {
    /// Build a direct-link request from an anchor destination.
    pub fn direct_link(url: impl Into<String>) -> Self {
        Self::DirectLink { url: url.into() }
    }

    /// Build a free-text request from a selection, trimming it first.
    ///
    /// Returns `None` when the trimmed text is shorter than [`MIN_QUERY_LEN`]
    /// characters; such selections are too short to identify a paper.
    pub fn free_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.chars().count() < MIN_QUERY_LEN {
            return None;
        }
        Some(Self::FreeTextQuery {
            text: text.to_string(),
        })
    }
}
