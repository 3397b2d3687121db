// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Raw-markup patterns worth seeing when an extraction looks wrong.
/// Each entry is (pattern, highlight type).
pub const OPINION_DEBUG_PATTERNS: &[(&str, &str)] = &[
    (r"(?is)<title[^>]*>.*?</title>", "title"),
    (r#"(?is)<a\s[^>]*class\s*=\s*["']?nt["']?[^>]*>.*?</a>"#, "marker"),
    // class must be exactly "b", as in the extractor's footnotes header check
    (
        r#"(?is)<p\s[^>]*class\s*=\s*(?:"b"|'b'|b\b)[^>]*>\s*(?:<[^>]+>\s*)*Footnotes"#,
        "footnotes",
    ),
];

/// Saves a copy of `html` to `path` with each highlight range wrapped in a styled span.
/// Overlapping ranges are skipped after the first one that claims the bytes.
pub fn save_debug_html(
    html: &str,
    path: &Path,
    highlights: &[(usize, usize, &str)],
) -> Result<(), AppError> {
    let mut file = File::create(path)?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-title { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-marker { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-footnotes { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n<pre>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > html.len() {
            continue;
        }
        debug_html.push_str(&escape_markup(&html[last_pos..start]));

        let css_class = match highlight_type {
            "title" => "highlight-title",
            "marker" => "highlight-marker",
            "footnotes" => "highlight-footnotes",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type
        ));
        debug_html.push_str(&escape_markup(&html[start..end]));
        debug_html.push_str("</span>");

        last_pos = end;
    }

    if last_pos < html.len() {
        debug_html.push_str(&escape_markup(&html[last_pos..]));
    }

    debug_html.push_str("\n</pre>\n</body>\n</html>");
    file.write_all(debug_html.as_bytes())?;

    tracing::debug!("Saved debug HTML to {}", path.display());
    Ok(())
}

/// Creates an annotated copy of a page with every match of `patterns` highlighted.
pub fn create_debug_html(
    html: &str,
    path: &Path,
    patterns: &[(&str, &str)],
) -> Result<usize, AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    save_debug_html(html, path, &highlights)?;
    Ok(highlights.len())
}

// The annotated copy shows the source markup, so it must not be rendered as markup itself.
fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_html_highlights_markers_and_footnotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.html");
        let html = r##"<html><head><title>G.R. No. 1</title></head><body>
            <p>Text<a class="nt" href="#fn1">1</a>more</p>
            <p class="b">Footnotes</p></body></html>"##;

        let count = create_debug_html(html, &path, OPINION_DEBUG_PATTERNS).unwrap();
        assert_eq!(count, 3);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("highlight-marker\" title"));
        assert!(written.contains("highlight-footnotes\" title"));
        assert!(written.contains("&lt;title&gt;G.R. No. 1&lt;/title&gt;"));
    }

    #[test]
    fn test_footnotes_highlight_needs_exact_class() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.html");
        let html = r#"<p class="big">Footnotes</p><p class="b c">Footnotes</p>
            <p class=b>Footnotes</p><p class='b'>Footnotes</p>"#;

        let count = create_debug_html(html, &path, OPINION_DEBUG_PATTERNS).unwrap();
        assert_eq!(count, 2);

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.matches("<span class=\"highlight-footnotes\"").count(), 2);
        // the near misses are left as plain escaped text
        assert!(written.contains(
            "&lt;p class=\"big\"&gt;Footnotes&lt;/p&gt;&lt;p class=\"b c\"&gt;Footnotes&lt;/p&gt;"
        ));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = create_debug_html("<p></p>", &dir.path().join("x.html"), &[("(", "bad")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
