// src/extractors/normalize.rs
//
// Repairs the artifacts markup-to-text extraction leaves in opinion paragraphs:
// stray footnote digits, words fused where a callout used to sit, and citation dates.
// The rules always run in the order below; each one sees the previous one's output.
// Rules 2-4 match the character in front of their target, so neighbouring hits can't
// share it within one pass; those rules are re-run until the text stops changing.

use regex::Regex;
use once_cell::sync::Lazy;

// 1. A 1-2 digit callout glued to the end of a word (or a closing quote or bracket) and
//    followed by a non-word character. A comma or period after the digits
//    only counts when it ends the clause, so amounts like "P50,000" survive.
static FUSED_CALLOUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\p{L}"”’)\]])\d{1,2}([^\w,.]|[,.](?:\s|$)|$)"#)
        .expect("Failed to compile FUSED_CALLOUT_RE")
});

// 2. Digits wedged between two letters with no surrounding space.
static EMBEDDED_DIGITS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{L})\d+(\p{L})").expect("Failed to compile EMBEDDED_DIGITS_RE")
});

// 3. Digits directly after a sentence period. Decimals ("1.5") are left alone.
static DIGITS_AFTER_PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\d])\.\d+").expect("Failed to compile DIGITS_AFTER_PERIOD_RE")
});

// 4. A capitalized word run into the previous word.
static FUSED_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w)(\p{Lu}\p{Ll})").expect("Failed to compile FUSED_WORDS_RE")
});

// 5.
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// 6. "January, 5" -> "January 5"
static MONTH_COMMA_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(January|February|March|April|May|June|July|August|September|October|November|December),\s*(\d{1,2})\b",
    )
    .expect("Failed to compile MONTH_COMMA_DAY_RE")
});

/// Applies all six cleanup rules to one paragraph.
pub fn normalize(raw: &str) -> String {
    let text = FUSED_CALLOUT_RE.replace_all(raw, "${1}${2}").into_owned();
    let text = replace_until_stable(&EMBEDDED_DIGITS_RE, text, "${1}${2}");
    let text = replace_until_stable(&DIGITS_AFTER_PERIOD_RE, text, "${1}.");
    let text = replace_until_stable(&FUSED_WORDS_RE, text, "${1} ${2}");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = text.trim();
    MONTH_COMMA_DAY_RE.replace_all(text, "${1} ${2}").into_owned()
}

// Every replacement of rules 2-4 removes a digit or splits a fused pair, so this ends.
fn replace_until_stable(re: &Regex, mut text: String, replacement: &str) -> String {
    loop {
        let next = re.replace_all(&text, replacement).into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

/// Normalizes every paragraph, then splits the joined result into non-empty trimmed lines.
pub fn clean_lines<S: AsRef<str>>(paragraphs: &[S]) -> Vec<String> {
    let joined = paragraphs
        .iter()
        .map(|paragraph| normalize(paragraph.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    joined
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_comma_day() {
        assert_eq!(normalize("filed on January, 5 2023"), "filed on January 5 2023");
        assert_eq!(normalize("dated March,12 2021."), "dated March 12 2021.");
    }

    #[test]
    fn test_digits_after_period() {
        assert_eq!(normalize("Id.12 The court ruled"), "Id. The court ruled");
        assert_eq!(normalize("a fine of PHP 1.5 million"), "a fine of PHP 1.5 million");
    }

    #[test]
    fn test_fused_callouts() {
        assert_eq!(normalize("the decision12, which"), "the decision, which");
        assert_eq!(normalize("as ruled in (Cruz)7 and"), "as ruled in (Cruz) and");
        assert_eq!(normalize("as “final”4 and executory"), "as “final” and executory");
        assert_eq!(normalize("the sum of P50,000.00 as damages"), "the sum of P50,000.00 as damages");
        assert_eq!(normalize("Section 5, Rule 45"), "Section 5, Rule 45");
    }

    #[test]
    fn test_embedded_digits_and_fused_words() {
        assert_eq!(normalize("the Court12The petition"), "the Court The petition");
        assert_eq!(normalize("the petitionerAverred"), "the petitioner Averred");
        assert_eq!(normalize("G.R. No. 198201"), "G.R. No. 198201");
    }

    #[test]
    fn test_adjacent_matches_all_repaired() {
        assert_eq!(normalize("This isAnAct of Congress"), "This is An Act of Congress");
        assert_eq!(normalize("Sec1a2b"), "Secab");
        assert_eq!(normalize("Id.1.2 The"), "Id.. The");
        assert_eq!(normalize("See Id.3 and Id.4 The"), "See Id. and Id. The");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(normalize("  The \t court\n\nruled.  "), "The court ruled.");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_marker_gap_is_preserved() {
        assert_eq!(normalize("wordA wordB"), "wordA wordB");
    }

    #[test]
    fn test_clean_lines_drops_empty_paragraphs() {
        let paragraphs = vec!["EN BANC", "   ", "", "The court\nruled.", "Id.3 So ordered."];
        assert_eq!(
            clean_lines(&paragraphs),
            vec!["EN BANC", "The court ruled.", "Id. So ordered."]
        );
    }

    #[test]
    fn test_normalize_is_idempotent_on_clean_text() {
        let once = normalize("The petitionerfiled on January, 5 2023.12 Id.");
        assert_eq!(normalize(&once), once);
    }
}
