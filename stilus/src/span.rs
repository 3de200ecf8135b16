use serde::{Deserialize, Serialize};

/// Circled-digit markers used to number answer choices
pub const CHOICE_NUMBERS: [&str; 10] = ["①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩"];

/// Positional span labels for square-style items
pub const LARGE_ALPHABET_LABELS: [&str; 7] = ["(A)", "(B)", "(C)", "(D)", "(E)", "(G)", "(H)"];

/// Positional span labels for underline-style items
pub const SMALL_ALPHABET_LABELS: [&str; 7] = ["(a)", "(b)", "(c)", "(d)", "(e)", "(g)", "(h)"];

/// One marked region of a passage
///
/// `start` and `end` are inclusive token indices. Within a span set the
/// `[start, end]` ranges never overlap and the set stays sorted by `start` -
/// both enforced by the selector at creation time, not at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSpan {
    pub start: usize,
    pub end: usize,
    /// Literal text of the range, reconstructed with space flags honored
    pub origin_text: String,
    /// Substitute text supplied by the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_text: Option<String>,
    /// Display order of origin/substitute is reversed
    #[serde(default)]
    pub is_switched: bool,
}

impl SelectionSpan {
    pub fn new(start: usize, end: usize, origin_text: String) -> Self {
        Self {
            start,
            end,
            origin_text,
            change_text: None,
            is_switched: false,
        }
    }

    /// The token index lies inside this span
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    /// `[start, end]` strictly encloses the other span on both sides
    ///
    /// This is the exact test the selector runs against new ranges. It does
    /// not catch a boundary falling inside an existing span - see
    /// [`Selector::click`](crate::Selector::click).
    pub fn enclosed_by(&self, start: usize, end: usize) -> bool {
        start < self.start && end > self.end
    }

    /// Display title for the span: the origin text alone until a substitute
    /// exists, then the `origin / substitute` pair, reversed when switched.
    pub fn display_title(&self) -> String {
        match self.change_text.as_deref() {
            None => self.origin_text.clone(),
            Some(change) if self.is_switched => format!("{change} / {}", self.origin_text),
            Some(change) => format!("{} / {change}", self.origin_text),
        }
    }
}

/// An answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Display text; a `/`-joined composite of three span variants for
    /// square-style items
    pub title: String,
    /// Exactly one choice in a generated set carries this
    pub is_answer: bool,
}
