//! Term matching shared by the relevance filters.
//!
//! All inputs are expected to be lowercased already.

/// Terms this short only match as whole words ("ai" must not hit "maintain").
const WORD_ONLY_LEN: usize = 2;
/// Terms up to this length must touch a word boundary on at least one side, so
/// "sql" hits "postgresql" and "api" hits "apis".
const SHORT_TERM_LEN: usize = 3;

/// Whether `term` occurs in `haystack` as a keyword hit.
///
/// Longer terms must start on a word boundary and may be a prefix of a longer word,
/// so "engineer" matches "engineering". Short terms may also carry a plural "s".
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let len = term.chars().count();
    occurrences(haystack, term).any(|(starts_clean, ends_clean)| {
        if len <= WORD_ONLY_LEN {
            starts_clean && ends_clean
        } else if len <= SHORT_TERM_LEN {
            starts_clean || ends_clean
        } else {
            starts_clean
        }
    })
}

/// Whether `word` occurs in `haystack` as a whole word or phrase.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    !word.is_empty()
        && haystack.match_indices(word).any(|(start, _)| {
            is_boundary_before(haystack, start) && is_boundary_after(haystack, start + word.len())
        })
}

/// Boundary flags for every occurrence of `needle`. The end flag tolerates a
/// trailing plural "s".
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = (bool, bool)> + 'a {
    let found = if needle.is_empty() {
        None
    } else {
        Some(haystack.match_indices(needle))
    };
    found.into_iter().flatten().map(move |(start, _)| {
        let end = start + needle.len();
        let plural_end = haystack[end..].starts_with('s') && is_boundary_after(haystack, end + 1);
        (
            is_boundary_before(haystack, start),
            is_boundary_after(haystack, end) || plural_end,
        )
    })
}

fn is_boundary_before(haystack: &str, index: usize) -> bool {
    haystack[..index]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn is_boundary_after(haystack: &str, index: usize) -> bool {
    haystack[index..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}

/// Splits on anything that is not alphanumeric and lowercases the pieces.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
