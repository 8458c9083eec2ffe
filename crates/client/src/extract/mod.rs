//! Result-count extraction from search result pages.
//!
//! The page is parsed once into an [`HtmlDocument`]; the text of the result
//! statistics element is then normalized and handed to [`parse_leading_count`].

pub mod count;

use scraper::{Html, Selector};

pub use count::parse_leading_count;

/// Element id carrying the "About N results" line.
pub const RESULT_STATS_ID: &str = "resultStats";

/// Minimal query capability over a parsed HTML document.
pub trait HtmlDocument {
    /// Text content of the element with `id`, if present.
    fn find_text_by_id(&self, id: &str) -> Option<String>;
}

/// [`HtmlDocument`] backed by `scraper`.
pub struct ScraperDocument {
    html: Html,
}

impl ScraperDocument {
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }
}

impl HtmlDocument for ScraperDocument {
    fn find_text_by_id(&self, id: &str) -> Option<String> {
        let selector = Selector::parse(&format!("[id=\"{}\"]", id.replace('"', "\\\""))).ok()?;
        let element = self.html.select(&selector).next()?;
        Some(element.text().collect::<Vec<_>>().join(" "))
    }
}

/// Whitespace-normalized text of the result statistics element.
///
/// Returns an empty string when the element is missing.
pub fn extract_result_stats(html: &str) -> String {
    stats_text(&ScraperDocument::parse(html))
}

pub fn stats_text(document: &impl HtmlDocument) -> String {
    document
        .find_text_by_id(RESULT_STATS_ID)
        .map(|text| normalize_whitespace(&text))
        .unwrap_or_default()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
