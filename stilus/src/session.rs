//! # Session Module - Complete Markup Session Management
//!
//! High-level interface for one quiz item's editing session. A session owns
//! the tokenized passage, the selector, the workflow status and the generated
//! choices, and exposes the operations a front end drives: clicking tokens,
//! committing substitutes, removing spans, re-rolling choices and rendering.
//!
//! ## Session lifecycle
//!
//! ```text
//! MakeSelection --(span set reaches max)--> MakeAnswer
//! MakeAnswer ----(all substitutes set)----> Complete
//! any state -----(remove_span)------------> MakeSelection
//! ```
//!
//! `ReadOnly` is a separate terminal mode for already-saved items; it never
//! transitions and ignores every mutating call.
//!
//! ## Usage
//!
//! ```rust
//! use stilus::{ClickOutcome, MarkupSession, SelectionStatus, SelectionStyle};
//!
//! let mut session = MarkupSession::new("The quick fox.", SelectionStyle::Underline, Some(1));
//!
//! // Two clicks close a span
//! assert_eq!(session.click_token(0).unwrap(), ClickOutcome::Started(0));
//! assert_eq!(session.click_token(1).unwrap(), ClickOutcome::SelectionFilled);
//! assert_eq!(session.status(), SelectionStatus::MakeAnswer);
//!
//! // Committing the substitute completes the underline item
//! let mut rng = rand::rng();
//! session.commit_substitute(&mut rng, 0, "A slow dog").unwrap();
//! assert_eq!(session.status(), SelectionStatus::Complete);
//! assert_eq!(session.choices().len(), 1);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::answer;
use crate::render::{self, RenderNode};
use crate::selector::{ClickOutcome, SelectError, SelectionStatus, SelectionStyle, Selector};
use crate::span::{Choice, SelectionSpan};
use crate::token::Passage;

const DEFAULT_PLACEHOLDER: &str = "Enter the substitute text";

/// What a substitute commit did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The session was not in an answering state; nothing changed
    Ignored,
    /// The substitute was stored; more are needed before choices exist
    Recorded,
    /// The substitute was stored and the choice set was (re)built
    Completed,
}

/// The persisted boundary record of a finished item
///
/// Everything else about a session is derived state: tokens are recomputed
/// from the passage text, and the workflow status from the spans and choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub passage: String,
    pub selection_positions: Vec<SelectionSpan>,
    pub choices: Vec<Choice>,
}

/// One quiz item's editing session
///
/// Single-threaded and synchronous: every operation runs to completion within
/// one user gesture, and validation failures leave the session unchanged.
#[derive(Debug, Clone)]
pub struct MarkupSession {
    passage: Passage,
    selector: Selector,
    style: SelectionStyle,
    status: SelectionStatus,
    choices: Vec<Choice>,
    placeholder: String,
}

impl MarkupSession {
    /// Create a session for a fresh item
    ///
    /// `max_spans` is the configured span budget (3 for square items, up to 5
    /// for underline). Passing `None` reproduces the unwired-caller state:
    /// every click is rejected with
    /// [`SelectError::Configuration`](crate::SelectError::Configuration).
    pub fn new(text: &str, style: SelectionStyle, max_spans: Option<usize>) -> Self {
        Self {
            passage: Passage::new(text),
            selector: Selector::new(max_spans),
            style,
            status: SelectionStatus::MakeSelection,
            choices: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Set the prompt text shown while substitute text is entered
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Open a saved record for viewing
    ///
    /// The session renders with labels and composites but ignores every
    /// mutating call.
    pub fn read_only(record: &QuizRecord, style: SelectionStyle) -> Self {
        let mut selector = Selector::new(Some(record.selection_positions.len()));
        selector.restore(record.selection_positions.clone());

        Self {
            passage: Passage::new(&record.passage),
            selector,
            style,
            status: SelectionStatus::ReadOnly,
            choices: record.choices.clone(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    pub fn spans(&self) -> &[SelectionSpan] {
        self.selector.spans()
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn status(&self) -> SelectionStatus {
        self.status
    }

    pub fn style(&self) -> SelectionStyle {
        self.style
    }

    pub fn max_spans(&self) -> Option<usize> {
        self.selector.max()
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The first click of an unfinished span pair
    pub fn pending_start(&self) -> Option<usize> {
        self.selector.pending_start()
    }

    /// Replace the passage text
    ///
    /// Tokens are derived state and are regenerated; the span set and choices
    /// are discarded wholesale since their indices no longer mean anything.
    pub fn set_passage(&mut self, text: &str) {
        if self.status == SelectionStatus::ReadOnly {
            return;
        }
        self.passage = Passage::new(text);
        self.selector = Selector::new(self.selector.max());
        self.choices.clear();
        self.status = SelectionStatus::MakeSelection;
    }

    /// Process a click on a token
    ///
    /// Only legal while selecting; in any other state the click handler is
    /// simply not wired, so the call is a no-op rather than an error. When
    /// the span set reaches its budget the session advances to
    /// [`SelectionStatus::MakeAnswer`].
    pub fn click_token(&mut self, index: usize) -> Result<ClickOutcome, SelectError> {
        if self.status != SelectionStatus::MakeSelection {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = self.selector.click(index, &self.passage)?;
        if outcome == ClickOutcome::SelectionFilled {
            self.status = SelectionStatus::MakeAnswer;
        }
        Ok(outcome)
    }

    /// Commit substitute text for one span
    ///
    /// Underline items rebuild the full choice set immediately, with the
    /// committed span as the answer, and complete. Square items complete once
    /// all three spans carry a substitute, which runs the square generator
    /// with the supplied randomness.
    pub fn commit_substitute<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        span_index: usize,
        text: &str,
    ) -> Result<CommitOutcome, SelectError> {
        if !matches!(
            self.status,
            SelectionStatus::MakeAnswer | SelectionStatus::Complete
        ) {
            return Ok(CommitOutcome::Ignored);
        }

        self.selector.commit_substitute(span_index, text)?;

        match self.style {
            SelectionStyle::Underline => {
                self.choices = answer::underline_choices(self.selector.spans(), span_index);
                self.status = SelectionStatus::Complete;
                Ok(CommitOutcome::Completed)
            }
            SelectionStyle::Square => {
                if self.selector.substituted_count() == 3 {
                    self.generate_square(rng);
                    Ok(CommitOutcome::Completed)
                } else {
                    Ok(CommitOutcome::Recorded)
                }
            }
        }
    }

    /// Remove one span
    ///
    /// Every remaining span loses its substitute and the session returns to
    /// selecting - positional labels shift with the set, so kept substitutes
    /// would mismatch what is displayed.
    pub fn remove_span(&mut self, span_index: usize) {
        if self.status == SelectionStatus::ReadOnly {
            return;
        }
        self.selector.remove(span_index);
        self.choices.clear();
        self.status = SelectionStatus::MakeSelection;
    }

    /// Drop all substitutes but keep the spans - the underline "swap the
    /// answer" flow
    ///
    /// Only meaningful once the answer phase has begun; in any other state
    /// the call is a no-op.
    pub fn clear_substitutes(&mut self) {
        if !matches!(
            self.status,
            SelectionStatus::MakeAnswer | SelectionStatus::Complete
        ) {
            return;
        }
        self.selector.clear_substitutes();
        self.choices.clear();
        self.status = SelectionStatus::MakeAnswer;
    }

    /// Re-roll the square choice set
    ///
    /// Regenerates the switch flags and the full set from scratch; no-op for
    /// underline items or before all substitutes exist.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.status == SelectionStatus::ReadOnly
            || self.style != SelectionStyle::Square
            || self.selector.substituted_count() != 3
        {
            return;
        }
        self.generate_square(rng);
    }

    /// Project the session into a renderable node sequence
    pub fn render(&self) -> Vec<RenderNode> {
        render::render(
            &self.passage,
            self.selector.spans(),
            self.status,
            self.style,
            self.selector.pending_start(),
        )
    }

    /// The persisted boundary record for this item
    pub fn finalize(&self) -> QuizRecord {
        QuizRecord {
            passage: self.passage.source().to_string(),
            selection_positions: self.selector.spans().to_vec(),
            choices: self.choices.clone(),
        }
    }

    fn generate_square<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.choices = answer::square_choices(rng, self.selector.spans_mut());
        self.status = SelectionStatus::Complete;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const PASSAGE: &str = "one two three four five six seven eight nine ten";

    fn select_pairs(session: &mut MarkupSession, pairs: &[(usize, usize)]) {
        for &(a, b) in pairs {
            session.click_token(a).unwrap();
            session.click_token(b).unwrap();
        }
    }

    #[test]
    fn test_underline_flow_completes() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Underline, Some(5));

        select_pairs(
            &mut session,
            &[(0, 0), (2, 2), (4, 4), (6, 6), (8, 8)],
        );
        assert_eq!(session.status(), SelectionStatus::MakeAnswer);

        let outcome = session.commit_substitute(&mut rng, 2, "altered").unwrap();
        assert_eq!(outcome, CommitOutcome::Completed);
        assert_eq!(session.status(), SelectionStatus::Complete);

        let answers: Vec<usize> = session
            .choices()
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.is_answer.then_some(i))
            .collect();
        assert_eq!(answers, [2]);
        assert_eq!(session.choices()[2].title, "altered");
    }

    #[test]
    fn test_square_flow_generates_on_third_substitute() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Square, Some(3));

        select_pairs(&mut session, &[(0, 1), (3, 4), (6, 7)]);
        assert_eq!(session.status(), SelectionStatus::MakeAnswer);

        assert_eq!(
            session.commit_substitute(&mut rng, 0, "first").unwrap(),
            CommitOutcome::Recorded
        );
        assert_eq!(
            session.commit_substitute(&mut rng, 1, "second").unwrap(),
            CommitOutcome::Recorded
        );
        assert_eq!(session.status(), SelectionStatus::MakeAnswer);

        assert_eq!(
            session.commit_substitute(&mut rng, 2, "third").unwrap(),
            CommitOutcome::Completed
        );
        assert_eq!(session.status(), SelectionStatus::Complete);
        assert_eq!(session.choices().len(), 5);
        assert_eq!(session.choices().iter().filter(|c| c.is_answer).count(), 1);
    }

    #[test]
    fn test_removal_resets_a_complete_square_item() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Square, Some(3));

        select_pairs(&mut session, &[(0, 1), (3, 4), (6, 7)]);
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            session.commit_substitute(&mut rng, i, text).unwrap();
        }
        assert_eq!(session.status(), SelectionStatus::Complete);

        session.remove_span(1);

        assert_eq!(session.status(), SelectionStatus::MakeSelection);
        assert_eq!(session.spans().len(), 2);
        assert!(session.spans().iter().all(|s| s.change_text.is_none()));
        assert!(session.choices().is_empty());
    }

    #[test]
    fn test_clicks_are_ignored_once_answering() {
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Underline, Some(1));

        select_pairs(&mut session, &[(0, 1)]);
        assert_eq!(session.status(), SelectionStatus::MakeAnswer);

        assert_eq!(session.click_token(5).unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.spans().len(), 1);
    }

    #[test]
    fn test_clear_substitutes_reopens_the_answer() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Underline, Some(2));

        select_pairs(&mut session, &[(0, 0), (2, 2)]);
        session.commit_substitute(&mut rng, 0, "swap me").unwrap();
        assert_eq!(session.status(), SelectionStatus::Complete);

        session.clear_substitutes();

        assert_eq!(session.status(), SelectionStatus::MakeAnswer);
        assert_eq!(session.spans().len(), 2);
        assert!(session.spans().iter().all(|s| s.change_text.is_none()));
        assert!(session.choices().is_empty());
    }

    #[test]
    fn test_reshuffle_rebuilds_square_choices() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Square, Some(3));

        select_pairs(&mut session, &[(0, 1), (3, 4), (6, 7)]);
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            session.commit_substitute(&mut rng, i, text).unwrap();
        }

        // The answer composite is stable across rerolls; slots may move
        let answer_title = |s: &MarkupSession| {
            s.choices()
                .iter()
                .find(|c| c.is_answer)
                .map(|c| c.title.clone())
                .unwrap()
        };
        let before = answer_title(&session);
        session.reshuffle(&mut rng);
        assert_eq!(session.status(), SelectionStatus::Complete);
        assert_eq!(answer_title(&session), before);
        assert_eq!(session.choices().len(), 5);
    }

    #[test]
    fn test_set_passage_discards_derived_state() {
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Underline, Some(5));
        select_pairs(&mut session, &[(0, 1)]);

        session.set_passage("brand new words");

        assert!(session.spans().is_empty());
        assert!(session.choices().is_empty());
        assert_eq!(session.status(), SelectionStatus::MakeSelection);
        assert_eq!(session.passage().len(), 3);
    }

    #[test]
    fn test_empty_passage_yields_no_spans() {
        let mut session = MarkupSession::new("", SelectionStyle::Underline, Some(5));

        assert_eq!(session.click_token(0).unwrap(), ClickOutcome::Ignored);
        assert!(session.spans().is_empty());
    }

    #[test]
    fn test_read_only_ignores_everything() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Underline, Some(1));
        select_pairs(&mut session, &[(0, 1)]);
        session.commit_substitute(&mut rng, 0, "altered").unwrap();

        let record = session.finalize();
        let mut viewer = MarkupSession::read_only(&record, SelectionStyle::Underline);

        assert_eq!(viewer.status(), SelectionStatus::ReadOnly);
        assert_eq!(viewer.click_token(5).unwrap(), ClickOutcome::Ignored);
        viewer.remove_span(0);
        viewer.clear_substitutes();
        assert_eq!(viewer.spans().len(), 1);
        assert_eq!(viewer.status(), SelectionStatus::ReadOnly);
    }

    #[test]
    fn test_finalize_round_trips_through_serde() {
        let mut rng = SmallRng::seed_from_u64(13);
        let mut session = MarkupSession::new(PASSAGE, SelectionStyle::Square, Some(3));
        select_pairs(&mut session, &[(0, 1), (3, 4), (6, 7)]);
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            session.commit_substitute(&mut rng, i, text).unwrap();
        }

        let record = session.finalize();
        let json = serde_json::to_string(&record).unwrap();
        let back: QuizRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.passage, PASSAGE);
        assert_eq!(back.selection_positions.len(), 3);
        assert_eq!(back.choices.len(), 5);
    }
}
