//! # Selector Module - Span Selection and Validation
//!
//! Builds spans one click at a time against a tokenized [`Passage`]. The
//! selector owns the span set and enforces its invariants at creation time:
//! no overlap, a configured maximum count, and ordering by `start`.
//!
//! All validation failures are synchronous rejections that leave the span set
//! unchanged. Nothing here is retried - repeating the same click would
//! reproduce the same rejection.

use thiserror::Error;

use crate::span::SelectionSpan;
use crate::token::Passage;

/// Visual style of a quiz item
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStyle {
    /// Up to five independent spans; one is designated the altered one
    Underline,
    /// Exactly three spans, each given a substitute, combined into five
    /// multi-part choices
    Square,
}

/// Workflow state of an editing session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// Spans are being selected token by token
    #[default]
    MakeSelection,
    /// The span set is full; substitutes are being entered
    MakeAnswer,
    /// Choices exist and the item is ready to persist
    Complete,
    /// A saved item is being viewed; no interaction is legal
    ReadOnly,
}

/// Rejections surfaced by the selector
///
/// All of these are recoverable and handled at the point of detection; the UI
/// layer translates them into transient notifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// No maximum span count was supplied - a caller wiring bug, not a
    /// steady-state user error
    #[error("no maximum span count is configured")]
    Configuration,

    /// The span set already holds the configured maximum
    #[error("no more than {max} selections can be made")]
    LimitReached { max: usize },

    /// The new range strictly encloses an existing span
    #[error("the range includes an already selected part")]
    Overlap,

    /// Substitute text was blank or whitespace-only
    #[error("substitute text must not be empty")]
    EmptySubstitute,
}

/// What a click did to the selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First click of a pair; the index is pending as the span start
    Started(usize),
    /// A span was created from the pending pair
    Selected,
    /// A span was created and the set reached the configured maximum
    SelectionFilled,
    /// The click landed where no handler is wired (inside an existing span,
    /// or out of range) and was dropped without touching any state
    Ignored,
}

/// Click-by-click span builder
///
/// Carries the pending first click and the current span set. The status
/// machine that gates *when* clicks are legal lives in
/// [`MarkupSession`](crate::MarkupSession); the selector only enforces
/// range-level invariants.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    spans: Vec<SelectionSpan>,
    pending_start: Option<usize>,
    max: Option<usize>,
}

impl Selector {
    pub fn new(max: Option<usize>) -> Self {
        Self {
            spans: Vec::new(),
            pending_start: None,
            max,
        }
    }

    pub fn spans(&self) -> &[SelectionSpan] {
        &self.spans
    }

    /// Adopt a persisted span set, e.g. when opening a saved record
    pub(crate) fn restore(&mut self, mut spans: Vec<SelectionSpan>) {
        spans.sort_by_key(|span| span.start);
        self.spans = spans;
        self.pending_start = None;
    }

    pub(crate) fn spans_mut(&mut self) -> &mut [SelectionSpan] {
        &mut self.spans
    }

    /// The first click of an unfinished pair, if any
    pub fn pending_start(&self) -> Option<usize> {
        self.pending_start
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// How many spans carry a substitute
    pub fn substituted_count(&self) -> usize {
        self.spans
            .iter()
            .filter(|span| span.change_text.is_some())
            .count()
    }

    /// Index of the span containing a token, if any
    pub fn span_at(&self, token_index: usize) -> Option<usize> {
        self.spans
            .iter()
            .position(|span| span.contains(token_index))
    }

    /// Process one click on a token
    ///
    /// The first click of a pair records a pending start. The second click
    /// closes the range (in either order), validates it and appends a new
    /// span with its origin text reconstructed from the passage.
    ///
    /// The overlap check rejects only a range that strictly encloses an
    /// existing span. A boundary falling *inside* an existing span is never
    /// produced here, because clicks on span-member tokens are dropped as
    /// [`ClickOutcome::Ignored`] - together the two rules keep the span set
    /// overlap-free.
    ///
    /// On rejection the pending start is left as it was, so the user can
    /// immediately retry with a different second click.
    pub fn click(
        &mut self,
        index: usize,
        passage: &Passage,
    ) -> Result<ClickOutcome, SelectError> {
        let Some(max) = self.max else {
            return Err(SelectError::Configuration);
        };

        if self.spans.len() >= max {
            return Err(SelectError::LimitReached { max });
        }

        if index >= passage.len() || self.span_at(index).is_some() {
            return Ok(ClickOutcome::Ignored);
        }

        let Some(pending) = self.pending_start else {
            self.pending_start = Some(index);
            return Ok(ClickOutcome::Started(index));
        };

        let (start, end) = if pending > index {
            (index, pending)
        } else {
            (pending, index)
        };

        if self.spans.iter().any(|span| span.enclosed_by(start, end)) {
            return Err(SelectError::Overlap);
        }

        let origin_text = passage.text_for_range(start, end);
        self.spans.push(SelectionSpan::new(start, end, origin_text));
        self.spans.sort_by_key(|span| span.start);
        self.pending_start = None;

        if self.spans.len() == max {
            Ok(ClickOutcome::SelectionFilled)
        } else {
            Ok(ClickOutcome::Selected)
        }
    }

    /// Remove the span at `span_index`
    ///
    /// Substitute text on every remaining span is invalidated as well: the
    /// positional labels shift with the set, so kept substitutes would no
    /// longer match what is displayed.
    pub fn remove(&mut self, span_index: usize) {
        if span_index >= self.spans.len() {
            return;
        }
        self.spans.remove(span_index);
        for span in &mut self.spans {
            span.change_text = None;
        }
        self.pending_start = None;
    }

    /// Attach substitute text to the span at `span_index`
    ///
    /// Rejects blank or whitespace-only text; the prior state is retained.
    pub fn commit_substitute(
        &mut self,
        span_index: usize,
        text: &str,
    ) -> Result<(), SelectError> {
        if text.trim().is_empty() {
            return Err(SelectError::EmptySubstitute);
        }
        if let Some(span) = self.spans.get_mut(span_index) {
            span.change_text = Some(text.to_string());
        }
        Ok(())
    }

    /// Drop every substitute but keep the spans - the "swap the answer" flow
    pub fn clear_substitutes(&mut self) {
        for span in &mut self.spans {
            span.change_text = None;
        }
    }
}
