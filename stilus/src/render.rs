use crate::selector::{SelectionStatus, SelectionStyle};
use crate::span::{LARGE_ALPHABET_LABELS, SMALL_ALPHABET_LABELS, SelectionSpan};
use crate::token::{Passage, is_special_character};

/// A plain token outside any span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNode {
    pub index: usize,
    pub text: String,
    /// A click handler should be wired to this token
    pub clickable: bool,
    /// The token is the pending first click of a span pair
    pub pending: bool,
    /// Styling hint for punctuation/symbol spacing
    pub special: bool,
    /// A single space follows in the original text
    pub space_after: bool,
}

/// A completed span, emitted once at its final token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedNode {
    pub span_index: usize,
    /// Positional label, present once the selection phase is over
    pub label: Option<String>,
    /// Origin text, or the origin/substitute composite
    pub title: String,
    pub substituted: bool,
    /// A remove control should be offered next to the span
    pub removable: bool,
}

/// One renderable unit of a projected passage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Token(TokenNode),
    Marked(MarkedNode),
    LineBreak,
}

/// Project a passage and its spans into a renderable node sequence
///
/// Pure and referentially stable: identical inputs produce identical output,
/// and neither tokens nor spans are touched. Safe to re-invoke on every state
/// change.
///
/// Tokens covered by a span are folded into a single [`MarkedNode`] emitted
/// at the span's final token. Newline tokens force a [`RenderNode::LineBreak`]
/// without consuming a token index of their own; a whitespace run that merely
/// begins or ends with a newline breaks before or after its content.
pub fn render(
    passage: &Passage,
    spans: &[SelectionSpan],
    status: SelectionStatus,
    style: SelectionStyle,
    pending_start: Option<usize>,
) -> Vec<RenderNode> {
    if status == SelectionStatus::ReadOnly {
        render_read_only(passage, spans, style)
    } else {
        render_interactive(passage, spans, status, style, pending_start)
    }
}

fn render_interactive(
    passage: &Passage,
    spans: &[SelectionSpan],
    status: SelectionStatus,
    style: SelectionStyle,
    pending_start: Option<usize>,
) -> Vec<RenderNode> {
    // Labels and substitutes only show once the selection phase is over
    let answering = matches!(
        status,
        SelectionStatus::MakeAnswer | SelectionStatus::Complete
    );
    let selecting = status == SelectionStatus::MakeSelection;

    let mut nodes = Vec::new();

    for token in passage.tokens() {
        if let Some(span_index) = spans.iter().position(|span| span.contains(token.index)) {
            let span = &spans[span_index];
            if span.end != token.index {
                continue;
            }

            let title = match style {
                SelectionStyle::Square => span.display_title(),
                SelectionStyle::Underline if answering => span
                    .change_text
                    .clone()
                    .unwrap_or_else(|| span.origin_text.clone()),
                SelectionStyle::Underline => span.origin_text.clone(),
            };

            nodes.push(RenderNode::Marked(MarkedNode {
                span_index,
                label: answering.then(|| style_label(style, span_index)),
                title,
                substituted: span.change_text.is_some(),
                removable: true,
            }));
            continue;
        }

        if token.is_newline() {
            nodes.push(RenderNode::LineBreak);
            continue;
        }

        let node = RenderNode::Token(TokenNode {
            index: token.index,
            text: token.text.clone(),
            clickable: selecting,
            pending: pending_start == Some(token.index),
            special: is_special_character(&token.text),
            space_after: token.space_after,
        });

        if token.breaks_before() {
            nodes.push(RenderNode::LineBreak);
            nodes.push(node);
        } else if token.breaks_after() {
            nodes.push(node);
            nodes.push(RenderNode::LineBreak);
        } else {
            nodes.push(node);
        }
    }

    nodes
}

fn render_read_only(
    passage: &Passage,
    spans: &[SelectionSpan],
    style: SelectionStyle,
) -> Vec<RenderNode> {
    let mut nodes = Vec::new();

    for token in passage.tokens() {
        if let Some(span_index) = spans.iter().position(|span| span.contains(token.index)) {
            let span = &spans[span_index];
            if span.end != token.index {
                continue;
            }

            let title = match style {
                SelectionStyle::Square => span.display_title(),
                SelectionStyle::Underline => span
                    .change_text
                    .clone()
                    .unwrap_or_else(|| span.origin_text.clone()),
            };

            nodes.push(RenderNode::Marked(MarkedNode {
                span_index,
                label: Some(style_label(style, span_index)),
                title,
                substituted: span.change_text.is_some(),
                removable: false,
            }));
            continue;
        }

        if token.is_newline() {
            nodes.push(RenderNode::LineBreak);
            continue;
        }

        let node = RenderNode::Token(TokenNode {
            index: token.index,
            text: token.text.clone(),
            clickable: false,
            pending: false,
            special: is_special_character(&token.text),
            space_after: token.space_after,
        });

        if token.breaks_before() {
            nodes.push(RenderNode::LineBreak);
            nodes.push(node);
        } else if token.breaks_after() {
            nodes.push(node);
            nodes.push(RenderNode::LineBreak);
        } else {
            nodes.push(node);
        }
    }

    nodes
}

fn style_label(style: SelectionStyle, span_index: usize) -> String {
    let table = match style {
        SelectionStyle::Square => &LARGE_ALPHABET_LABELS,
        SelectionStyle::Underline => &SMALL_ALPHABET_LABELS,
    };
    (*table.get(span_index).unwrap_or(&"")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(nodes: &[RenderNode]) -> Vec<&MarkedNode> {
        nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Marked(mark) => Some(mark),
                _ => None,
            })
            .collect()
    }

    fn spans_for(passage: &Passage, ranges: &[(usize, usize)]) -> Vec<SelectionSpan> {
        ranges
            .iter()
            .map(|&(start, end)| {
                SelectionSpan::new(start, end, passage.text_for_range(start, end))
            })
            .collect()
    }

    #[test]
    fn test_span_emits_one_marked_node() {
        let passage = Passage::new("one two three four");
        let spans = spans_for(&passage, &[(1, 2)]);

        let nodes = render(
            &passage,
            &spans,
            SelectionStatus::MakeSelection,
            SelectionStyle::Underline,
            None,
        );

        // one, [two three], four
        assert_eq!(nodes.len(), 3);
        let marks = marked(&nodes);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].title, "two three ");
        assert!(marks[0].label.is_none());
        assert!(marks[0].removable);
    }

    #[test]
    fn test_clickable_only_while_selecting() {
        let passage = Passage::new("one two three");
        let spans = spans_for(&passage, &[(0, 0)]);

        let selecting = render(
            &passage,
            &spans,
            SelectionStatus::MakeSelection,
            SelectionStyle::Square,
            None,
        );
        let answering = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Square,
            None,
        );

        let is_clickable = |nodes: &[RenderNode]| {
            nodes.iter().any(|node| {
                matches!(node, RenderNode::Token(token) if token.clickable)
            })
        };
        assert!(is_clickable(&selecting));
        assert!(!is_clickable(&answering));
    }

    #[test]
    fn test_labels_appear_after_selection_phase() {
        let passage = Passage::new("one two three four five six");
        let spans = spans_for(&passage, &[(0, 0), (2, 2), (4, 4)]);

        let nodes = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Square,
            None,
        );

        let labels: Vec<_> = marked(&nodes)
            .iter()
            .map(|mark| mark.label.clone().unwrap())
            .collect();
        assert_eq!(labels, ["(A)", "(B)", "(C)"]);
    }

    #[test]
    fn test_underline_shows_substitute_once_answering() {
        let passage = Passage::new("one two three");
        let mut spans = spans_for(&passage, &[(1, 1)]);
        spans[0].change_text = Some("2".into());

        let selecting = render(
            &passage,
            &spans,
            SelectionStatus::MakeSelection,
            SelectionStyle::Underline,
            None,
        );
        assert_eq!(marked(&selecting)[0].title, "two ");

        let answering = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Underline,
            None,
        );
        assert_eq!(marked(&answering)[0].title, "2");
    }

    #[test]
    fn test_square_composite_title() {
        let passage = Passage::new("one two three");
        let mut spans = spans_for(&passage, &[(1, 1)]);
        spans[0].change_text = Some("2".into());

        let nodes = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Square,
            None,
        );
        assert_eq!(marked(&nodes)[0].title, "two  / 2");

        spans[0].is_switched = true;
        let nodes = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Square,
            None,
        );
        assert_eq!(marked(&nodes)[0].title, "2 / two ");
    }

    #[test]
    fn test_newlines_force_line_breaks() {
        let passage = Passage::new("one\ntwo");
        let nodes = render(
            &passage,
            &[],
            SelectionStatus::MakeSelection,
            SelectionStyle::Underline,
            None,
        );

        assert!(matches!(nodes[0], RenderNode::Token(_)));
        assert!(matches!(nodes[1], RenderNode::LineBreak));
        assert!(matches!(nodes[2], RenderNode::Token(_)));
    }

    #[test]
    fn test_pending_flag_marks_first_click() {
        let passage = Passage::new("one two three");
        let nodes = render(
            &passage,
            &[],
            SelectionStatus::MakeSelection,
            SelectionStyle::Underline,
            Some(1),
        );

        let pending: Vec<usize> = nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Token(token) if token.pending => Some(token.index),
                _ => None,
            })
            .collect();
        assert_eq!(pending, [1]);
    }

    #[test]
    fn test_read_only_is_inert_and_labeled() {
        let passage = Passage::new("one two three four");
        let mut spans = spans_for(&passage, &[(1, 2)]);
        spans[0].change_text = Some("other words".into());

        let nodes = render(
            &passage,
            &spans,
            SelectionStatus::ReadOnly,
            SelectionStyle::Square,
            None,
        );

        assert!(nodes.iter().all(|node| {
            !matches!(node, RenderNode::Token(token) if token.clickable)
        }));
        let marks = marked(&nodes);
        assert_eq!(marks[0].label.as_deref(), Some("(A)"));
        assert!(!marks[0].removable);
    }

    #[test]
    fn test_render_is_stable_for_identical_inputs() {
        let passage = Passage::new("one two three four five");
        let spans = spans_for(&passage, &[(0, 1), (3, 3)]);

        let first = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Underline,
            None,
        );
        let second = render(
            &passage,
            &spans,
            SelectionStatus::MakeAnswer,
            SelectionStyle::Underline,
            None,
        );
        assert_eq!(first, second);
    }
}
