//! Lexicon matching helpers shared by the scorers and detectors
//!
//! All helpers expect lower-cased input.

/// Byte offsets of occurrences of `term` not flanked by alphanumerics
pub(crate) fn word_matches<'a>(text: &'a str, term: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(term)
        .filter(move |_| !term.is_empty())
        .filter_map(move |(start, matched)| {
            let before = text[..start].chars().next_back();
            let after = text[start + matched.len()..].chars().next();
            let bounded = before.map_or(true, |c| !c.is_alphanumeric())
                && after.map_or(true, |c| !c.is_alphanumeric());
            bounded.then_some(start)
        })
}

/// Whether `term` occurs in `text` as a whole word or phrase
pub(crate) fn contains_word(text: &str, term: &str) -> bool {
    word_matches(text, term).next().is_some()
}

/// Whether `term` occurs at the start of a word
///
/// Inflected forms count: "except" matches "exceptions" and "excepted".
pub(crate) fn contains_word_start(text: &str, term: &str) -> bool {
    !term.is_empty()
        && text.match_indices(term).any(|(start, _)| {
            text[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
        })
}

/// Whether `term` occurs as a whole word that is not directly negated
///
/// "not eligible" does not affirm "eligible".
pub(crate) fn contains_affirmed(text: &str, term: &str) -> bool {
    word_matches(text, term).any(|start| {
        let preceding = text[..start].trim_end();
        !(preceding.ends_with(" not") || preceding == "not" || preceding.ends_with(" no longer"))
    })
}

/// Number of non-overlapping substring occurrences of `term`
pub(crate) fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.matches(term).count()
}

/// Lower-cased query terms of at least `min_chars` characters
///
/// Leading and trailing punctuation is stripped before the length check.
pub(crate) fn query_terms(query: &str, min_chars: usize) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive membership test against a configured name list
pub(crate) fn contains_name(names: &[String], name: &str) -> bool {
    names.iter().any(|n| n.trim().eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        assert!(contains_word("priority due to age-related needs", "age"));
        assert!(!contains_word("see the next page", "age"));
        assert!(!contains_word("applicants are ineligible", "eligible"));
        assert!(contains_word("decided case-by-case.", "case-by-case"));
        assert!(!contains_word("anything", ""));
    }

    #[test]
    fn test_word_start_accepts_inflections() {
        assert!(contains_word_start("exceptions apply to seasonal workers", "except"));
        assert!(contains_word_start("persons excepted under section 4", "except"));
        assert!(!contains_word_start("all are accepted", "cept"));
        assert!(!contains_word_start("text", ""));
    }

    #[test]
    fn test_affirmed_skips_negation() {
        assert!(!contains_affirmed("students are not eligible", "eligible"));
        assert!(contains_affirmed("residents are eligible", "eligible"));
        assert!(contains_affirmed(
            "minors are not eligible but adults are eligible",
            "eligible"
        ));
    }

    #[test]
    fn test_count_occurrences() {
        assert_eq!(count_occurrences("income, income and incomes", "income"), 3);
        assert_eq!(count_occurrences("text", ""), 0);
    }

    #[test]
    fn test_query_terms() {
        let terms = query_terms("Am I eligible for housing benefit?", 4);
        assert_eq!(terms, vec!["eligible", "housing", "benefit"]);
    }

    #[test]
    fn test_contains_name() {
        let names = vec!["United States".to_string()];
        assert!(contains_name(&names, "united states"));
        assert!(!contains_name(&names, "United Kingdom"));
    }
}
