//! # Token Module - Passage Tokenization
//!
//! Splits raw passage text into an ordered sequence of lexical units while
//! keeping enough information to reconstruct the original string exactly.
//!
//! ## Tokenization rules
//!
//! A single regex pass classifies the passage into three kinds of segment:
//!
//! - Whitespace runs (`\s+`)
//! - Maximal runs of word characters (Hangul jamo, Hangul syllables, Latin
//!   letters and digits)
//! - Any other character, matched singly, so every symbol becomes its own
//!   token
//!
//! A whitespace run consisting of exactly one space is not emitted as a
//! token. Its presence is folded into the `space_after` flag of the token
//! before it, which keeps token indices contiguous for the tokens a user can
//! actually select. Every other whitespace run (newlines, tabs, multiple
//! spaces) is kept verbatim as a [`TokenKind::Whitespace`] token, so
//! reconstruction never normalizes the input.
//!
//! ```text
//! "The quick fox."
//! Tokens:      [The][quick][fox][.]
//! space_after: [ * ][  *  ][   ][ ]
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Segment pattern: whitespace runs, word runs, then any single other
/// character. Alternation order matters - the word classes must win over the
/// catch-all.
static SEGMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+|[ㄱ-ㅎㅏ-ㅣ가-힣A-Za-z0-9]+|[^\sㄱ-ㅎㅏ-ㅣ가-힣A-Za-z0-9]")
        .expect("segment pattern is a constant")
});

const fn is_word_char(char: char) -> bool {
    matches!(char, 'ㄱ'..='ㅎ' | 'ㅏ'..='ㅣ' | '가'..='힣' | 'A'..='Z' | 'a'..='z' | '0'..='9')
}

/// Returns true if any character of `text` falls outside the word-character
/// classes. Used for rendering spacing only - it has no effect on
/// tokenization.
pub fn is_special_character(text: &str) -> bool {
    text.chars().any(|char| !is_word_char(char))
}

/// Classification of a [`Token`]'s text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of Hangul or Latin/digit word characters
    Word,
    /// A preserved whitespace run (never a single space)
    Whitespace,
    /// A single punctuation, symbol or other special character
    Special,
}

/// An atomic unit of a tokenized passage
///
/// Tokens are immutable once produced; the whole sequence is regenerated
/// whenever the passage text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position in the token sequence, zero-based and contiguous
    pub index: usize,
    /// The literal substring of the passage
    pub text: String,
    pub kind: TokenKind,
    /// True when a single space followed this token in the original text
    pub space_after: bool,
}

impl Token {
    /// The token is exactly one newline and renders as a line break only
    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }

    /// A line break must be rendered before this token's content
    pub fn breaks_before(&self) -> bool {
        !self.is_newline() && self.text.starts_with('\n')
    }

    /// A line break must be rendered after this token's content
    pub fn breaks_after(&self) -> bool {
        !self.is_newline() && !self.text.starts_with('\n') && self.text.contains('\n')
    }
}

/// A tokenized passage
///
/// Owns the source string and the derived token sequence. Spans are described
/// purely in token-index space against this sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    source: String,
    tokens: Vec<Token>,
    /// A single space opened the passage before any token existed to carry it
    leading_space: bool,
}

impl Passage {
    /// Tokenize a passage
    ///
    /// An empty or whitespace-only passage yields an empty (or
    /// whitespace-token-only) sequence; selection against it simply produces
    /// no spans.
    ///
    /// ```rust
    /// use stilus::Passage;
    ///
    /// let passage = Passage::new("The quick fox.");
    /// let texts: Vec<&str> = passage.tokens().iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["The", "quick", "fox", "."]);
    /// assert!(passage.tokens()[0].space_after);
    /// assert!(!passage.tokens()[2].space_after);
    /// ```
    pub fn new(text: &str) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut leading_space = false;

        for segment in SEGMENTS.find_iter(text) {
            let piece = segment.as_str();

            if piece == " " {
                // Folded into the preceding token instead of taking an index
                match tokens.last_mut() {
                    Some(previous) => previous.space_after = true,
                    None => leading_space = true,
                }
                continue;
            }

            let kind = if piece.chars().all(char::is_whitespace) {
                TokenKind::Whitespace
            } else if piece.chars().all(is_word_char) {
                TokenKind::Word
            } else {
                TokenKind::Special
            };

            tokens.push(Token {
                index: tokens.len(),
                text: piece.to_string(),
                kind,
                space_after: false,
            });
        }

        Self {
            source: text.to_string(),
            tokens,
            leading_space,
        }
    }

    /// The original passage text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The number of tokens in the sequence
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Reconstruct the literal text of an inclusive token range
    ///
    /// A token's `space_after` flag contributes a single space, including on
    /// the final token of the range, so word-boundary spacing survives when
    /// the result is displayed on its own.
    pub fn text_for_range(&self, start: usize, end: usize) -> String {
        let mut text = String::new();
        for token in self.tokens.iter().take(end + 1).skip(start) {
            text.push_str(&token.text);
            if token.space_after {
                text.push(' ');
            }
        }
        text
    }

    /// Rebuild the full passage text from the token sequence
    ///
    /// Round-trips exactly for any input, double spaces and tabs included.
    pub fn reconstruct(&self) -> String {
        let mut text = String::with_capacity(self.source.len());
        if self.leading_space {
            text.push(' ');
        }
        for token in &self.tokens {
            text.push_str(&token.text);
            if token.space_after {
                text.push(' ');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_words_and_punctuation() {
        let passage = Passage::new("The quick fox.");

        let texts: Vec<&str> = passage.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["The", "quick", "fox", "."]);

        let flags: Vec<bool> = passage.tokens().iter().map(|t| t.space_after).collect();
        assert_eq!(flags, [true, true, false, false]);

        assert_eq!(passage.tokens()[3].kind, TokenKind::Special);
        assert_eq!(passage.tokens()[0].kind, TokenKind::Word);
    }

    #[test]
    fn test_symbols_tokenize_singly() {
        let passage = Passage::new("wait...");

        let texts: Vec<&str> = passage.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["wait", ".", ".", "."]);
    }

    #[test]
    fn test_mixed_hangul_and_latin() {
        let passage = Passage::new("문맥상 적절한 word를 고르시오.");

        let texts: Vec<&str> = passage.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["문맥상", "적절한", "word를", "고르시오", "."]);
        assert!(passage.tokens().iter().take(3).all(|t| t.space_after));
    }

    #[test]
    fn test_round_trip_is_exact() {
        let inputs = [
            "",
            " ",
            "plain words here",
            "double  space and\ttab",
            "leading space? yes",
            " starts with space",
            "line one\nline two\n",
            "quotes “like this” and symbols ① ② ★",
            "한국어와 English mixed, with punctuation!",
            "trailing space ",
        ];

        for input in inputs {
            let passage = Passage::new(input);
            assert_eq!(passage.reconstruct(), input, "failed for {input:?}");
        }
    }

    #[test]
    fn test_whitespace_runs_survive_as_tokens() {
        let passage = Passage::new("a  b");

        // The double space is a token of its own, not a space_after flag
        let texts: Vec<&str> = passage.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["a", "  ", "b"]);
        assert_eq!(passage.tokens()[1].kind, TokenKind::Whitespace);
        assert!(!passage.tokens()[0].space_after);
    }

    #[test]
    fn test_newline_break_classification() {
        let passage = Passage::new("one\ntwo");

        let newline = &passage.tokens()[1];
        assert!(newline.is_newline());
        assert!(!newline.breaks_before());
        assert!(!newline.breaks_after());

        // A run like "\n\t" breaks before its rendered content
        let passage = Passage::new("one\n\ttwo");
        let run = &passage.tokens()[1];
        assert_eq!(run.text, "\n\t");
        assert!(run.breaks_before());

        // A run like "\t\n" breaks after it
        let passage = Passage::new("one\t\ntwo");
        let run = &passage.tokens()[1];
        assert_eq!(run.text, "\t\n");
        assert!(run.breaks_after());
    }

    #[test]
    fn test_empty_passage() {
        let passage = Passage::new("");
        assert!(passage.is_empty());
        assert_eq!(passage.reconstruct(), "");
    }

    #[test]
    fn test_text_for_range_honors_space_flags() {
        let passage = Passage::new("The quick fox.");

        // Trailing space of the range's last token is kept
        assert_eq!(passage.text_for_range(0, 1), "The quick ");
        assert_eq!(passage.text_for_range(2, 3), "fox.");
    }

    #[test]
    fn test_special_character_predicate() {
        assert!(is_special_character("."));
        assert!(is_special_character("“"));
        assert!(is_special_character("\n"));
        assert!(!is_special_character("word"));
        assert!(!is_special_character("문맥상"));
        assert!(!is_special_character("word를"));
    }
}
