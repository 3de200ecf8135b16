//! # Stilus
//!
//! A library for building passage-marking quiz editors: tokenize a reading
//! passage, select contiguous token runs as spans, attach substitute text,
//! and derive multiple-choice answer sets from the completed spans.
//!
//! [`MarkupSession`] is the main entry point; the topic modules are exported
//! for callers that drive the pieces directly.

pub mod answer;
pub mod render;
pub mod selector;
pub mod session;
pub mod span;
pub mod token;

pub use selector::{ClickOutcome, SelectError, SelectionStatus, SelectionStyle, Selector};
pub use session::{CommitOutcome, MarkupSession, QuizRecord};
pub use span::{
    CHOICE_NUMBERS, Choice, LARGE_ALPHABET_LABELS, SMALL_ALPHABET_LABELS, SelectionSpan,
};
pub use token::{Passage, Token, TokenKind, is_special_character};
