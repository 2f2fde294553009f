//! # Text Layout
//!
//! Wraps arbitrary strings to the fixed column width of the device screen.
//!
//! Text is tokenized on whitespace and packed greedily, one separating space
//! between tokens. A token wider than the line is hard-split at the column
//! boundary so no emitted line is ever wider than `width`.
//!
//! ```text
//! wrap("the quick brown fox", 9)  →  ["the quick", "brown fox"]
//! wrap("abcdefghij", 4)           →  ["abcd", "efgh", "ij"]
//! wrap("", 4)                     →  [""]
//! ```
//!
//! Widths are display columns (`unicode-width`), which for ASCII is simply the
//! character count.

use unicode_width::UnicodeWidthStr;

/// Build textwrap options for a grid of `width` columns.
///
/// First-fit (greedy) packing, no hyphenation, ASCII spaces as the only
/// separator and hard breaks for words that don't fit a whole line.
fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .word_splitter(textwrap::WordSplitter::NoHyphenation)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
}

/// Number of display columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Wrap `text` into lines no wider than `width` columns.
///
/// Always returns at least one line; empty or whitespace-only input yields a
/// single empty line so an empty chat turn still occupies a row.
/// A `width` of 0 is treated as 1.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return vec![String::new()];
    }

    let mut lines: Vec<String> = textwrap::wrap(&normalized, wrap_options(width))
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        " ",
        "hi",
        "Hello! How are you today?",
        "The sun is a star. It is very, very hot and very far away from us.",
        "supercalifragilisticexpialidocious",
        "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh iiiiiiiii jjjjjjjjjj",
        "tabs\tand\nnewlines   and   runs of spaces",
        "well-known, self-evident; (parenthetical) punctuation...",
        "short then averyveryverylongtokenthatoverflows then short",
    ];

    // -- width invariant ---------------------------------------------------

    #[test]
    fn wrap_never_exceeds_width() {
        for text in SAMPLES {
            for width in 1..=24 {
                for line in wrap(text, width) {
                    assert!(
                        display_width(&line) <= width,
                        "line {:?} wider than {} (input {:?})",
                        line,
                        width,
                        text
                    );
                }
            }
        }
    }

    #[test]
    fn wrap_always_returns_at_least_one_line() {
        for text in SAMPLES {
            for width in 1..=24 {
                assert!(!wrap(text, width).is_empty());
            }
        }
    }

    // -- reconstruction ------------------------------------------------------

    #[test]
    fn wrap_reconstructs_token_sequence() {
        let text = "The sun is a star. It is very,   very hot\tand far away.";
        let expected: Vec<&str> = text.split_whitespace().collect();

        for width in 10..=40 {
            let joined = wrap(text, width).join(" ");
            let tokens: Vec<&str> = joined.split_whitespace().collect();
            assert_eq!(tokens, expected, "width {}", width);
        }
    }

    #[test]
    fn wrap_packs_greedily() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("a b c d", 3), vec!["a b", "c d"]);
    }

    #[test]
    fn wrap_fits_on_one_line_when_short() {
        assert_eq!(wrap("hi there", 40), vec!["hi there"]);
    }

    #[test]
    fn wrap_exact_width_line() {
        assert_eq!(wrap("abcd efgh", 9), vec!["abcd efgh"]);
        assert_eq!(wrap("abcd efgh", 8), vec!["abcd", "efgh"]);
    }

    // -- over-length tokens --------------------------------------------------

    #[test]
    fn wrap_hard_splits_long_token() {
        let word = "supercalifragilisticexpialidocious";
        let lines = wrap(word, 10);

        assert!(lines.len() > 1);
        assert!(lines.len() <= word.len().div_ceil(10));
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn wrap_hard_split_pieces_are_full_width() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_long_token_starts_on_fresh_line() {
        let lines = wrap("hi abcdefghijkl", 5);
        assert_eq!(lines[0], "hi");
        assert!(lines[1..].iter().all(|l| l.len() <= 5));
        assert_eq!(lines[1..].concat(), "abcdefghijkl");
    }

    // -- edge cases ----------------------------------------------------------

    #[test]
    fn wrap_empty_is_single_empty_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn wrap_whitespace_only_is_single_empty_line() {
        assert_eq!(wrap("   \t\n ", 10), vec![String::new()]);
    }

    #[test]
    fn wrap_zero_width_behaves_like_one() {
        assert_eq!(wrap("ab", 0), vec!["a", "b"]);
    }

    #[test]
    fn wrap_keeps_punctuation_and_hyphens() {
        // Hyphens are not break opportunities; only the column limit is.
        let lines = wrap("well-known self-evident", 10);
        assert_eq!(lines[0], "well-known");
        assert!(lines.iter().all(|l| l.len() <= 10));
        assert_eq!(lines[1..].concat(), "self-evident");

        assert_eq!(wrap("Wait... what?!", 40), vec!["Wait... what?!"]);
    }

    #[test]
    fn wrap_does_not_mutate_input() {
        let text = String::from("  keep   me  ");
        let _ = wrap(&text, 4);
        assert_eq!(text, "  keep   me  ");
    }

    #[test]
    fn display_width_counts_columns() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }
}
