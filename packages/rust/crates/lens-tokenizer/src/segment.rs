//! Word-boundary segmentation with coarse categories.

use unicode_segmentation::UnicodeSegmentation;

/// Coarse category of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Whitespace run.
    Space,
    /// Numeral such as `2023`, `3.14` or `1,000`.
    Num,
    /// Punctuation, symbols and emoji (no letters or digits).
    Punct,
    /// Anything containing a letter.
    Word,
}

/// One UAX #29 word-boundary segment with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Byte offset into the segmented text.
    pub start: usize,
    /// Segment text.
    pub text: &'a str,
    /// Category.
    pub kind: SegmentKind,
}

impl Segment<'_> {
    /// Byte offset one past the segment.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Whether the segment starts with an uppercase letter.
    #[must_use]
    pub fn is_capitalized(&self) -> bool {
        self.kind == SegmentKind::Word && self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Whether the segment is an all-caps abbreviation of two or more letters.
    #[must_use]
    pub fn is_acronym(&self) -> bool {
        self.kind == SegmentKind::Word
            && self.text.chars().filter(|c| c.is_alphabetic()).count() >= 2
            && self
                .text
                .chars()
                .all(|c| !c.is_alphabetic() || c.is_uppercase())
    }

    /// Whether the segment closes a sentence or a markdown block.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.kind == SegmentKind::Punct
            && self
                .text
                .chars()
                .any(|c| matches!(c, '.' | '!' | '?' | ':' | ';' | '#' | '-' | '*' | '>' | '|' | '•'))
    }
}

/// Split `text` on word boundaries and categorize every piece.
#[must_use]
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    text.split_word_bound_indices()
        .map(|(start, piece)| Segment {
            start,
            text: piece,
            kind: classify(piece),
        })
        .collect()
}

fn classify(piece: &str) -> SegmentKind {
    if piece.chars().all(char::is_whitespace) {
        return SegmentKind::Space;
    }
    if !piece.chars().any(char::is_alphanumeric) {
        return SegmentKind::Punct;
    }
    let numeric = piece.chars().next().is_some_and(char::is_numeric)
        && piece
            .chars()
            .all(|c| c.is_numeric() || matches!(c, '.' | ',' | '\'' | '_'));
    if numeric {
        SegmentKind::Num
    } else {
        SegmentKind::Word
    }
}
