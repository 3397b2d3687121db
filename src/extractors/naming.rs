// src/extractors/naming.rs
use std::fmt;

/// Base name used when a page has no usable title.
pub const PLACEHOLDER_NAME: &str = "untitled_opinion";

/// Filesystem base name derived from an opinion's title, e.g. "G.R. No. 198201" -> "gr_no_198201".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentName(String);

impl DocumentName {
    /// Periods are dropped, spaces become underscores and the result is lower-cased.
    /// Path separators and control characters are stripped as well; an empty result
    /// (or a missing title) falls back to [`PLACEHOLDER_NAME`].
    pub fn derive(title: Option<&str>) -> Self {
        let Some(title) = title else {
            tracing::warn!("Document has no title, using placeholder name '{}'", PLACEHOLDER_NAME);
            return Self::placeholder();
        };

        let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
        let name: String = collapsed
            .replace('.', "")
            .replace(' ', "_")
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
            .collect();

        if name.is_empty() || name.chars().all(|c| c == '_') {
            tracing::warn!(
                "Title {:?} yields an empty name, using placeholder '{}'",
                title,
                PLACEHOLDER_NAME
            );
            return Self::placeholder();
        }
        Self(name)
    }

    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_case_title() {
        assert_eq!(DocumentName::derive(Some("G.R. No. 198201")).as_str(), "gr_no_198201");
        assert_eq!(DocumentName::derive(Some("A.C. No. 8367")).as_str(), "ac_no_8367");
        let admin = DocumentName::derive(Some("A.M. No. CA-24-002-P"));
        assert_eq!(admin.as_str(), "am_no_ca-24-002-p");
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        assert_eq!(DocumentName::derive(None).as_str(), PLACEHOLDER_NAME);
        assert_eq!(DocumentName::derive(Some("...")).as_str(), PLACEHOLDER_NAME);
    }

    #[test]
    fn test_separators_and_whitespace_runs() {
        assert_eq!(DocumentName::derive(Some("  G.R.  Nos. 1/2\n ")).as_str(), "gr_nos_12");
        assert_eq!(DocumentName::derive(Some("..\\..\\etc")).as_str(), "etc");
    }

    #[test]
    fn test_same_title_same_name() {
        let title = Some("G.R. No. 1");
        assert_eq!(DocumentName::derive(title), DocumentName::derive(title));
    }
}
