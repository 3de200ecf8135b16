use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use stilus::{CHOICE_NUMBERS, MarkupSession};

use super::{Editor, Message, Page};
use crate::{
    config::Config,
    utils::{KeyEventHelper, PassageView, center, centered_padding, height_of_lines, passage_lines},
};

/// Page: Read-only preview
///
/// Shows the finished item the way a saved quiz renders: labels and
/// composites everywhere, nothing clickable. Backspace returns to the editor
/// with its state intact.
#[derive(Debug)]
pub struct Preview {
    viewer: MarkupSession,
    editor: Option<Box<Editor>>,
}

impl Preview {
    pub fn new(editor: Editor) -> Self {
        let viewer = MarkupSession::read_only(&editor.snapshot(), editor.style());
        Self {
            viewer,
            editor: Some(Box::new(editor)),
        }
    }
}

// Rendering logic
impl Preview {
    pub fn render(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let [passage_area, choices_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(8)]).areas(area);

        let view = PassageView {
            theme: &config.settings.theme,
            style: self.viewer.style(),
            cursor: None,
            target: None,
            dim_plain: true,
        };

        let lines = passage_lines(&self.viewer.render(), &view);
        let passage_area = center(
            passage_area,
            Constraint::Percentage(80),
            Constraint::Percentage(100),
        );
        let height = height_of_lines(&lines, passage_area);
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(centered_padding(passage_area, Some(height), None)));
        frame.render_widget(paragraph, passage_area);

        self.render_choices(frame, choices_area, config);
    }

    pub fn render_top(&self, _config: &Config) -> Option<Line<'_>> {
        Some(Line::raw("preview · <Backspace> to edit"))
    }

    fn render_choices(&self, frame: &mut Frame, area: Rect, config: &Config) {
        let theme = &config.settings.theme;
        let mut lines: Vec<Line> = Vec::new();

        for (index, choice) in self.viewer.choices().iter().enumerate() {
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

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(centered_padding(area, None, None)));
        frame.render_widget(paragraph, area);
    }
}

// Event handlers
impl Preview {
    pub fn handle_events(&mut self, event: &Event, _config: &Config) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
            && key.code == KeyCode::Backspace
        {
            return self.editor.take().map(|editor| {
                Message::Show(Page::Editor(editor))
            });
        }

        None
    }
}
