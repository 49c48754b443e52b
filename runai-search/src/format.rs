//! Text rendering of search outcomes for LLM consumption.
//!
//! Every function here is pure: the same input always renders the same
//! bytes, and missing fields render as `N/A` rather than failing.

use crate::types::{EnrichedCandidate, WebSearchResponse};

const NOT_AVAILABLE: &str = "N/A";
const SEPARATOR: &str = "\n---\n\n";

/// Which tool a section belongs to; selects the section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Bounded fan-out web search.
    Web,
    /// Two-phase shopping lookup.
    Shopping,
}

impl SectionKind {
    fn heading(&self, query: &str) -> String {
        match self {
            Self::Web => format!("## Search Results for \"{query}\"\n\n"),
            Self::Shopping => format!("## Google Shopping Results for \"{query}\"\n\n"),
        }
    }
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render one web search section.
///
/// The synthesised answer, when present, comes before the itemised results.
pub fn web_section(query: &str, response: &WebSearchResponse, snippet_chars: usize) -> String {
    let mut out = SectionKind::Web.heading(query);
    if let Some(answer) = response.answer.as_deref() {
        out.push_str(&format!("### Answer\n\n{answer}\n\n"));
    }
    for (i, result) in response.results.iter().enumerate() {
        out.push_str(&format!(
            "**{}. {}**\n",
            i + 1,
            result.title.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        out.push_str(&format!(
            "URL: {}\n",
            result.url.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        out.push_str(&format!("Score: {:.2}\n", result.score));
        out.push_str(truncate_chars(&result.content, snippet_chars));
        out.push('\n');
        out.push_str(SEPARATOR);
    }
    out
}

/// Render one shopping section with its candidates.
pub fn shopping_section(query: &str, candidates: &[EnrichedCandidate]) -> String {
    let mut out = SectionKind::Shopping.heading(query);
    for (i, enriched) in candidates.iter().enumerate() {
        out.push_str(&candidate_block(i + 1, enriched));
    }
    out
}

fn candidate_block(index: usize, enriched: &EnrichedCandidate) -> String {
    let candidate = &enriched.candidate;
    let title = candidate.title.as_deref().unwrap_or(NOT_AVAILABLE);

    let mut out = format!("### {index}. {title}\n");
    if let Some(thumbnail) = candidate.thumbnail.as_deref() {
        out.push_str(&format!("![{title}]({thumbnail})\n"));
    }
    out.push_str(&format!(
        "**Price**: {}\n",
        candidate.price.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    out.push_str(&format!(
        "**Source**: {}\n",
        candidate.source.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    if let Some(rating) = candidate.rating {
        out.push_str(&format!(
            "**Rating**: {rating} ({} reviews)\n",
            candidate.reviews
        ));
    }

    let listings = enriched.enrichment.listings();
    if listings.is_empty() {
        out.push_str(&format!(
            "**Link**: {}\n",
            candidate.product_link.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
    } else {
        out.push_str("**Purchase Links**:\n");
        for listing in listings {
            out.push_str(&format!(
                "  - [{}]({}) - {}\n",
                listing.name,
                listing.link.as_deref().unwrap_or(NOT_AVAILABLE),
                listing.price.as_deref().unwrap_or(NOT_AVAILABLE)
            ));
        }
    }
    out.push_str(SEPARATOR);
    out
}

/// Section for a shopping query that matched nothing.
pub fn no_products_section(query: &str) -> String {
    format!(
        "{}No products found for \"{query}\"\n",
        SectionKind::Shopping.heading(query)
    )
}

/// Degradation notice for a shopping query the provider kept throttling.
pub fn rate_limited_section(query: &str) -> String {
    format!(
        "{}⚠️ **API Rate Limited** - Price lookup failed. \
         Use Tavily to search for prices instead.\n\n",
        SectionKind::Shopping.heading(query)
    )
}

/// Section for a shopping query the provider rejected.
pub fn provider_error_section(query: &str, detail: &str) -> String {
    format!(
        "{}SerpAPI error: {detail}\n",
        SectionKind::Shopping.heading(query)
    )
}

/// Inline error section for a failed query.
pub fn failure_section(kind: SectionKind, query: &str, detail: &str) -> String {
    format!("{}Error: {detail}\n\n", kind.heading(query))
}

/// Concatenate sections in order.
pub fn join_sections<I, S>(sections: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sections.into_iter().fold(String::new(), |mut acc, s| {
        acc.push_str(s.as_ref());
        acc
    })
}
