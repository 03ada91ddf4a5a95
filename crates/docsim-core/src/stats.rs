//! Structural text statistics.
//!
//! Counts the paragraphs, words, and characters of a plain-text
//! document. Splitting is deliberately simple: whitespace and
//! blank-line boundaries are the full extent of parsing; there is no
//! language-aware tokenization.
//!
//! # Counting rules
//!
//! - **Paragraphs** — non-empty segments separated by blank-line
//!   boundaries, where a boundary is a run of two or more consecutive
//!   newlines (CRLF pairs count as one newline).
//! - **Words** — non-empty segments separated by runs of spaces, tabs,
//!   carriage returns, or newlines.
//! - **Characters** — decoded `char` count, not byte count, so
//!   multi-byte content is counted by what the reader sees.

/// Paragraph, word, and character counts for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub paragraphs: i64,
    pub words: i64,
    pub characters: i64,
}

/// Compute [`TextStats`] for a document.
///
/// An empty document yields zero for all three counts.
pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        paragraphs: paragraph_count(text),
        words: word_count(text),
        characters: text.chars().count() as i64,
    }
}

/// Count non-empty segments between blank-line boundaries.
///
/// A boundary is a maximal run of two or more `\n` after CRLF
/// normalization; a lone newline stays inside its segment.
fn paragraph_count(text: &str) -> i64 {
    let normalized = text.replace("\r\n", "\n");
    let mut paragraphs = 0i64;
    let mut in_segment = false;
    let mut chars = normalized.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            let mut run = 1usize;
            while chars.peek() == Some(&'\n') {
                chars.next();
                run += 1;
            }
            if run >= 2 {
                if in_segment {
                    paragraphs += 1;
                }
                in_segment = false;
            } else {
                in_segment = true;
            }
        } else {
            in_segment = true;
        }
    }
    if in_segment {
        paragraphs += 1;
    }
    paragraphs
}

/// Count non-empty segments between runs of space, tab, CR, or LF.
fn word_count(text: &str) -> i64 {
    text.split(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n')
        .filter(|w| !w.is_empty())
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_paragraph_document() {
        let stats = text_stats("Hello world.\n\nSecond paragraph here.");
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.characters, 36);
    }

    #[test]
    fn test_empty_document() {
        let stats = text_stats("");
        assert_eq!(stats.paragraphs, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 0);
    }

    #[test]
    fn test_single_paragraph_with_internal_newlines() {
        // Lone newlines do not open a new paragraph.
        let stats = text_stats("line one\nline two\nline three");
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.words, 6);
    }

    #[test]
    fn test_crlf_paragraph_boundary() {
        let stats = text_stats("first\r\n\r\nsecond");
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_run_of_three_newlines_is_one_boundary() {
        let stats = text_stats("first\n\n\nsecond");
        assert_eq!(stats.paragraphs, 2);
    }

    #[test]
    fn test_leading_and_trailing_blank_lines() {
        let stats = text_stats("\n\nonly paragraph\n\n");
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_words_split_on_tabs_and_mixed_whitespace() {
        let stats = text_stats("one\ttwo   three\nfour");
        assert_eq!(stats.words, 4);
    }

    #[test]
    fn test_characters_counted_not_bytes() {
        // Four chars, more than four bytes.
        let stats = text_stats("héllö");
        assert_eq!(stats.characters, 5);
        assert!("héllö".len() > 5);
    }

    #[test]
    fn test_whitespace_only_document_has_no_words() {
        let stats = text_stats("   \t ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.characters, 5);
    }
}
