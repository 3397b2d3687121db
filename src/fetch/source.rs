// src/fetch/source.rs
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::error::FetchError;

/// Where a single opinion page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(String),
    File(PathBuf),
}

impl DocumentSource {
    /// Classifies a command-line argument: anything with an http(s) scheme is a URL,
    /// everything else is treated as a local HTML file.
    pub fn from_arg(arg: &str) -> Self {
        let trimmed = arg.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DocumentSource::Url(trimmed.to_string())
        } else {
            DocumentSource::File(PathBuf::from(trimmed))
        }
    }

    /// Identifier used in status lines.
    pub fn id(&self) -> String {
        match self {
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::File(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// Parses a newline-delimited source list. Blank lines and `#` comments are ignored.
pub fn parse_source_list(contents: &str) -> Vec<DocumentSource> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(DocumentSource::from_arg)
        .collect()
}

/// Reads a source list file from disk.
pub fn read_source_list(path: &Path) -> Result<Vec<DocumentSource>, FetchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FetchError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_source_list(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arg_classifies_urls_and_paths() {
        assert_eq!(
            DocumentSource::from_arg(" https://lawphil.net/judjuris/juri2023/mar2023/gr_198201_2023.html "),
            DocumentSource::Url("https://lawphil.net/judjuris/juri2023/mar2023/gr_198201_2023.html".to_string())
        );
        assert_eq!(
            DocumentSource::from_arg("HTTP://example.test/a.html"),
            DocumentSource::Url("HTTP://example.test/a.html".to_string())
        );
        assert_eq!(
            DocumentSource::from_arg("pages/gr_1.html"),
            DocumentSource::File(PathBuf::from("pages/gr_1.html"))
        );
    }

    #[test]
    fn test_parse_source_list_skips_comments_and_blanks() {
        let list = "# 2023 decisions\n\nhttps://a.test/1.html\n   \n  saved/2.html  \n#https://skipped.test\n";
        let sources = parse_source_list(list);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id(), "https://a.test/1.html");
        assert_eq!(sources[1], DocumentSource::File(PathBuf::from("saved/2.html")));
    }

    #[test]
    fn test_read_source_list_missing_file() {
        let err = read_source_list(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, FetchError::File { .. }));
    }
}
