//! Export-link extraction from results-page HTML.

use scraper::{Html, Selector};

/// Find the first anchor whose destination contains `pattern`, in document
/// order. Parsing is inert: no scripts run, no sub-resources load.
pub fn find_export_link(html: &str, pattern: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a").ok()?;

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(pattern))
        .map(str::to_string)
}
