// src/extractors/opinion.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use scraper::{Html, Selector, ElementRef, node::Node};
use once_cell::sync::Lazy;

// --- CSS Selectors (Lazy Static) ---
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to compile TITLE_SELECTOR")
});

// Elements that separate words even when the markup has no whitespace around them.
const BLOCK_TAGS: &[&str] = &[
    "br", "div", "p", "blockquote", "li", "ul", "ol", "table", "tr", "td", "th",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

// --- Configuration ---
/// Markup conventions of the opinion pages being walked.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Tag of body paragraphs.
    pub paragraph_tag: String,
    /// Sole class carried by the paragraph that opens the footnotes section.
    pub footnotes_header_class: String,
    /// Literal word the footnotes header paragraph must contain.
    pub footnotes_marker_word: String,
    /// Tag and class of inline footnote callouts.
    pub marker_tag: String,
    pub marker_class: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            paragraph_tag: "p".to_string(),
            footnotes_header_class: "b".to_string(),
            footnotes_marker_word: "Footnotes".to_string(),
            marker_tag: "a".to_string(),
            marker_class: "nt".to_string(),
        }
    }
}

// --- Data Structures ---
#[derive(Debug, Clone, Default)]
pub struct ExtractedOpinion {
    pub title: Option<String>,       // Text of the <title> node, whitespace-collapsed
    pub paragraphs: Vec<String>,     // Body paragraphs in document order, before normalization
    pub markers_removed: usize,      // Footnote callouts excised from collected paragraphs
    pub reached_footnotes: bool,     // Whether the scan stopped at the footnotes header
}

// --- Main Extractor Structure ---
pub struct OpinionExtractor {
    config: ExtractorConfig,
}

impl OpinionExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Parses raw markup and extracts the title and body paragraphs.
    pub fn extract(&self, html_content: &str) -> Result<ExtractedOpinion, ExtractError> {
        if html_content.trim().is_empty() {
            return Err(ExtractError::Parse("document is empty".to_string()));
        }

        let document = Html::parse_document(html_content);
        if !document.errors.is_empty() {
            tracing::trace!("html5ever recovered from {} markup errors", document.errors.len());
        }

        let title = self.find_title(&document);
        let mut opinion = self.extract_paragraphs(&document);
        opinion.title = title;

        tracing::debug!(
            "Extracted {} paragraphs ({} footnote markers removed, footnotes header reached: {})",
            opinion.paragraphs.len(),
            opinion.markers_removed,
            opinion.reached_footnotes
        );
        Ok(opinion)
    }

    /// Returns the first title node's text, or None when it is missing or blank.
    pub fn find_title(&self, document: &Html) -> Option<String> {
        let element = document.select(&TITLE_SELECTOR).next()?;
        let text = element.text().collect::<Vec<_>>().join(" ");
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() { None } else { Some(collapsed) }
    }

    /// Walks every element in document order, collecting paragraph text until the
    /// footnotes header. Nothing after the header is visited.
    pub fn extract_paragraphs(&self, document: &Html) -> ExtractedOpinion {
        let mut opinion = ExtractedOpinion::default();

        for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
            if element.value().name() != self.config.paragraph_tag {
                continue;
            }

            let mut markers = 0;
            let text = self.paragraph_text(element, &mut markers);

            if self.is_footnotes_header(element, &text) {
                tracing::debug!("Reached footnotes header, stopping paragraph scan");
                opinion.reached_footnotes = true;
                break;
            }

            opinion.markers_removed += markers;
            opinion.paragraphs.push(text);
        }

        opinion
    }

    /// Descendant text of a paragraph with footnote markers excised. Inline elements are
    /// concatenated as-is so "Court<b>'s</b>" stays one word; a removed marker or a block
    /// boundary contributes a space. Whitespace runs collapse to one space and the ends
    /// are trimmed, so a marker always leaves exactly one space between its neighbours.
    fn paragraph_text(&self, paragraph: ElementRef, markers: &mut usize) -> String {
        let mut fragments = Vec::new();
        self.collect_fragments(paragraph, &mut fragments, markers);
        fragments
            .concat()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn collect_fragments<'a>(
        &self,
        element: ElementRef<'a>,
        out: &mut Vec<&'a str>,
        markers: &mut usize,
    ) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                if self.is_marker(child_element) {
                    *markers += 1;
                    out.push(" ");
                } else if BLOCK_TAGS.contains(&child_element.value().name()) {
                    out.push(" ");
                    self.collect_fragments(child_element, out, markers);
                    out.push(" ");
                } else {
                    self.collect_fragments(child_element, out, markers);
                }
            } else if let Node::Text(text) = child.value() {
                out.push(&**text);
            }
        }
    }

    fn is_marker(&self, element: ElementRef) -> bool {
        let value = element.value();
        value.name() == self.config.marker_tag
            && value.classes().any(|class| class == self.config.marker_class)
    }

    fn is_footnotes_header(&self, paragraph: ElementRef, text: &str) -> bool {
        let mut classes = paragraph.value().classes();
        let sole_class = matches!(
            (classes.next(), classes.next()),
            (Some(class), None) if class == self.config.footnotes_header_class
        );
        sole_class && text.contains(&self.config.footnotes_marker_word)
    }
}

impl Default for OpinionExtractor {
    fn default() -> Self {
        Self::new()
    }
}
