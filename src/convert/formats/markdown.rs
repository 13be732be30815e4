//! Markdown extractor.
//!
//! Markdown sources are rendered to HTML with `comrak` at read time; the
//! extractor works on that HTML only.

use comrak::{markdown_to_html, ComrakOptions};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::Extracted;
use crate::model::{NO_CONTENT, NO_TITLE};

static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Marker line left behind by fenced blocks tagged `markdown`.
const MARKDOWN_MARKER: &str = "markdown\n";

const CODE_FENCE: &str = "```";

/// Renders Markdown source to HTML.
pub fn render(source: &str) -> String {
    markdown_to_html(source, &ComrakOptions::default())
}

/// Derives title and content from rendered Markdown.
///
/// Title is the text of the first `<h1>`. Content is the visible text of the
/// rest of the document with the first occurrence of the title removed, a
/// leading `markdown` marker line and all code fences stripped, and
/// surrounding whitespace trimmed.
pub fn extract(html: &str) -> Extracted {
    let document = Html::parse_document(html);
    let heading = document.select(&H1_SELECTOR).next();

    let title = heading
        .map(|h1| h1.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let heading_id = heading.map(|h1| h1.id());
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        if let Some(id) = heading_id {
            if node.ancestors().any(|ancestor| ancestor.id() == id) {
                continue;
            }
        }
        text.push_str(fragment);
    }

    if title != NO_TITLE {
        text = text.replacen(title.as_str(), "", 1);
    }

    let mut content = text.trim();
    if let Some(rest) = content.strip_prefix(MARKDOWN_MARKER) {
        content = rest;
    }
    let content = content.replace(CODE_FENCE, "").trim().to_string();

    Extracted {
        title,
        content: if content.is_empty() {
            NO_CONTENT.to_string()
        } else {
            content
        },
    }
}
