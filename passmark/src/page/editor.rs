use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use stilus::{
    CHOICE_NUMBERS, ClickOutcome, CommitOutcome, LARGE_ALPHABET_LABELS, MarkupSession, QuizRecord,
    SMALL_ALPHABET_LABELS, SelectionStatus, SelectionStyle, render::RenderNode,
};

use super::{Message, Preview};
use crate::{
    app::Notice,
    config::Config,
    utils::{KeyEventHelper, PassageView, center, centered_padding, height_of_lines, passage_lines},
};

const GUIDE_HEIGHT: u16 = 10;

/// Page: Markup editor
///
/// Drives one [`MarkupSession`]. A token cursor stands in for the original's
/// mouse clicks: Enter "clicks" the token under the cursor, and once the span
/// budget is filled, typed text accumulates into the substitute input.
#[derive(Debug, Clone)]
pub struct Editor {
    session: MarkupSession,
    output: PathBuf,
    cursor: usize,
    input: String,
    target: usize,
}

impl Editor {
    /// Creates a new editor for one quiz item
    pub fn new(
        config: &Config,
        passage: String,
        output: PathBuf,
        style: SelectionStyle,
        budget: usize,
    ) -> Self {
        let placeholder = config.settings.placeholders.for_style(style);
        let session =
            MarkupSession::new(&passage, style, Some(budget)).with_placeholder(placeholder);

        let mut editor = Self {
            session,
            output,
            cursor: 0,
            input: String::new(),
            target: 0,
        };
        editor.snap_cursor();
        editor
    }

    /// The record as it stands right now
    pub fn snapshot(&self) -> QuizRecord {
        self.session.finalize()
    }

    pub fn style(&self) -> SelectionStyle {
        self.session.style()
    }
}

// Event handlers
impl Editor {
    pub fn handle_events(&mut self, event: &Event, _config: &Config) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        if key.has_mods(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('r') => self.remove_target(),
                KeyCode::Char('x') => self.clear_substitutes(),
                KeyCode::Char('s') => self.reshuffle(),
                KeyCode::Char('w') => self.write_record(),
                KeyCode::Char('p') => self.open_preview(),
                _ => None,
            };
        }

        match self.session.status() {
            SelectionStatus::MakeSelection => self.handle_selection_key(key),
            SelectionStatus::MakeAnswer | SelectionStatus::Complete => {
                self.handle_answer_key(key)
            }
            SelectionStatus::ReadOnly => None,
        }
    }

    fn handle_selection_key(&mut self, key: &KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_cursor(false);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_cursor(true);
                None
            }
            KeyCode::Enter => match self.session.click_token(self.cursor) {
                Ok(ClickOutcome::SelectionFilled) => {
                    self.target = 0;
                    self.input.clear();
                    Some(Message::Notify(Notice::info(
                        "Span budget reached - enter the substitutes",
                    )))
                }
                Ok(ClickOutcome::Selected) => {
                    self.snap_cursor();
                    None
                }
                Ok(_) => None,
                Err(error) => Some(Message::Notify(Notice::error(error.to_string()))),
            },
            _ => None,
        }
    }

    fn handle_answer_key(&mut self, key: &KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Tab => {
                let count = self.session.spans().len();
                if count > 0 {
                    self.target = (self.target + 1) % count;
                    self.input.clear();
                }
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Enter => self.commit_input(),
            KeyCode::Char(character) => {
                self.input.push(character);
                None
            }
            _ => None,
        }
    }

    fn commit_input(&mut self) -> Option<Message> {
        let mut rng = rand::rng();
        let text = self.input.clone();
        match self.session.commit_substitute(&mut rng, self.target, &text) {
            Ok(CommitOutcome::Completed) => {
                self.input.clear();
                Some(Message::Notify(Notice::info("Choice set generated")))
            }
            Ok(CommitOutcome::Recorded) => {
                self.input.clear();
                // Jump to the next span still missing its substitute
                if let Some(next) = self
                    .session
                    .spans()
                    .iter()
                    .position(|span| span.change_text.is_none())
                {
                    self.target = next;
                }
                None
            }
            Ok(CommitOutcome::Ignored) => None,
            // The original surfaces the input prompt itself as the error text
            Err(_) => Some(Message::Notify(Notice::error(self.session.placeholder()))),
        }
    }

    fn remove_target(&mut self) -> Option<Message> {
        let count = self.session.spans().len();
        if count == 0 {
            return None;
        }

        let index = match self.session.status() {
            SelectionStatus::MakeAnswer | SelectionStatus::Complete => self.target.min(count - 1),
            _ => count - 1,
        };
        self.session.remove_span(index);
        self.target = 0;
        self.input.clear();
        self.snap_cursor();

        Some(Message::Notify(Notice::info(
            "Selection removed - remaining substitutes were cleared",
        )))
    }

    fn clear_substitutes(&mut self) -> Option<Message> {
        if !matches!(
            self.session.status(),
            SelectionStatus::MakeAnswer | SelectionStatus::Complete
        ) {
            return None;
        }
        self.session.clear_substitutes();
        self.target = 0;
        self.input.clear();

        Some(Message::Notify(Notice::info(
            "Substitutes cleared - pick the answer again",
        )))
    }

    fn reshuffle(&mut self) -> Option<Message> {
        if self.session.style() != SelectionStyle::Square
            || self.session.status() != SelectionStatus::Complete
        {
            return None;
        }
        let mut rng = rand::rng();
        self.session.reshuffle(&mut rng);

        Some(Message::Notify(Notice::info("Choices reshuffled")))
    }

    fn write_record(&mut self) -> Option<Message> {
        if self.session.status() != SelectionStatus::Complete {
            return Some(Message::Notify(Notice::error(
                "Complete the item before writing it",
            )));
        }

        let record = self.session.finalize();
        let text = match toml::to_string_pretty(&record) {
            Ok(text) => text,
            Err(error) => return Some(Message::Error(Box::new(error))),
        };
        if let Err(error) = std::fs::write(&self.output, text) {
            return Some(Message::Error(Box::new(error)));
        }

        Some(Message::Notify(Notice::info(format!(
            "Quiz record written to {}",
            self.output.display()
        ))))
    }

    fn open_preview(&mut self) -> Option<Message> {
        if self.session.status() != SelectionStatus::Complete {
            return Some(Message::Notify(Notice::error(
                "Complete the item to preview it",
            )));
        }
        Some(Message::Show(Preview::new(self.clone()).into()))
    }

    /// Token indices the cursor may rest on: clickable and visible
    fn clickable_indices(&self) -> Vec<usize> {
        self.session
            .render()
            .iter()
            .filter_map(|node| match node {
                RenderNode::Token(token) if token.clickable && !token.text.trim().is_empty() => {
                    Some(token.index)
                }
                _ => None,
            })
            .collect()
    }

    fn move_cursor(&mut self, forward: bool) {
        let clickable = self.clickable_indices();
        if clickable.is_empty() {
            return;
        }

        let position = clickable
            .iter()
            .position(|&index| index >= self.cursor)
            .unwrap_or(clickable.len() - 1);
        let next = if forward {
            (position + 1).min(clickable.len() - 1)
        } else {
            position.saturating_sub(1)
        };
        self.cursor = clickable[next];
    }

    /// Keep the cursor on a clickable token after the span set changed
    fn snap_cursor(&mut self) {
        let clickable = self.clickable_indices();
        if clickable.contains(&self.cursor) {
            return;
        }
        self.cursor = clickable
            .iter()
            .find(|&&index| index > self.cursor)
            .or_else(|| clickable.last())
            .copied()
            .unwrap_or(0);
    }
}

// Rendering logic
impl Editor {
    pub fn render(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let [passage_area, guide_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(GUIDE_HEIGHT)]).areas(area);

        self.render_passage(frame, passage_area, config);
        self.render_guide(frame, guide_area, config);
    }

    pub fn render_top(&self, _config: &Config) -> Option<Line<'_>> {
        let status = match self.session.status() {
            SelectionStatus::MakeSelection => "selecting",
            SelectionStatus::MakeAnswer => "answering",
            SelectionStatus::Complete => "complete",
            SelectionStatus::ReadOnly => "read-only",
        };
        let budget = self.session.max_spans().unwrap_or(0);

        Some(Line::raw(format!(
            "{} {}/{budget} {status}",
            self.session.style(),
            self.session.spans().len(),
        )))
    }

    fn render_passage(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let status = self.session.status();
        let view = PassageView {
            theme: &config.settings.theme,
            style: self.session.style(),
            cursor: (status == SelectionStatus::MakeSelection).then_some(self.cursor),
            target: matches!(
                status,
                SelectionStatus::MakeAnswer | SelectionStatus::Complete
            )
            .then_some(self.target),
            dim_plain: false,
        };

        let lines = passage_lines(&self.session.render(), &view);
        let area = center(area, Constraint::Percentage(80), Constraint::Percentage(100));
        let height = height_of_lines(&lines, area);
        let padding = centered_padding(area, Some(height), None);
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(padding));

        frame.render_widget(paragraph, area);
    }

    fn render_guide(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let theme = &config.settings.theme;
        let mut lines: Vec<Line> = Vec::new();

        match self.session.status() {
            SelectionStatus::MakeSelection => {
                let max = self.session.max_spans().unwrap_or(0);
                lines.push(Line::from(
                    format!(
                        "Mark the spans to test ({} / {max})",
                        self.session.spans().len()
                    )
                    .bold(),
                ));
                lines.push(Line::raw(
                    "←/→ move · Enter mark start/end · Ctrl-R undo last span",
                ));
            }
            SelectionStatus::MakeAnswer => {
                lines.push(Line::from(
                    format!("Enter the substitute for span {}", self.target_label()).bold(),
                ));
                lines.push(Line::from(vec![
                    Span::raw("> "),
                    Span::styled(
                        if self.input.is_empty() {
                            self.session.placeholder().to_string()
                        } else {
                            self.input.clone()
                        },
                        if self.input.is_empty() {
                            Style::new().fg(theme.text.highlight).dim()
                        } else {
                            Style::new().fg(theme.term_fg)
                        },
                    ),
                    Span::styled("_", Style::new().fg(theme.text.highlight)),
                ]));
                lines.push(Line::raw(
                    "Tab next span · Enter commit · Ctrl-R remove span",
                ));
            }
            SelectionStatus::Complete => {
                lines.push(Line::from(self.question_title().bold()));
                for (index, choice) in self.session.choices().iter().enumerate() {
                    let number = CHOICE_NUMBERS.get(index).unwrap_or(&"·");
                    let style = if choice.is_answer {
                        Style::new().fg(theme.mark.answer).bold()
                    } else {
                        Style::new().fg(theme.term_fg)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("{number} {}", choice.title),
                        style,
                    )));
                }
                lines.push(Line::raw(
                    "Ctrl-S reshuffle · Ctrl-X swap answer · Ctrl-P preview · Ctrl-W write",
                ));
            }
            SelectionStatus::ReadOnly => (),
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(centered_padding(area, None, None)));
        frame.render_widget(paragraph, area);
    }

    fn target_label(&self) -> &str {
        let table = match self.session.style() {
            SelectionStyle::Square => &LARGE_ALPHABET_LABELS,
            SelectionStyle::Underline => &SMALL_ALPHABET_LABELS,
        };
        table.get(self.target).copied().unwrap_or("")
    }

    fn question_title(&self) -> &'static str {
        match self.session.style() {
            SelectionStyle::Square => {
                "Choose the option whose bracketed parts all fit the context:"
            }
            SelectionStyle::Underline => "Which underlined part does not fit the context?",
        }
    }
}
