use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Constraint,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List},
};
use strum::IntoEnumIterator;

use stilus::SelectionStyle;

use super::{Editor, Message};
use crate::{
    config::Config,
    utils::{KeyEventHelper, center, centered_padding},
};

/// Span budgets offered for underline items. Square items always use three
/// spans - the generator's combinatorics depend on it.
const UNDERLINE_BUDGETS: [usize; 4] = [1, 2, 3, 5];

const SQUARE_BUDGET: usize = 3;

#[derive(Debug, Clone, Copy)]
enum State {
    StyleSelect,
    BudgetSelect,
}

/// Page: Main menu
#[derive(Debug)]
pub struct Menu {
    passage: String,
    output: PathBuf,
    state: State,
    styles: Vec<SelectionStyle>,
    style_index: usize,
    budget_index: usize,
}

impl Menu {
    /// Creates a new menu
    pub fn new(config: &Config, passage: String, output: PathBuf) -> Self {
        let styles: Vec<SelectionStyle> = SelectionStyle::iter().collect();
        let style_index = config
            .settings
            .default_style
            .and_then(|style| styles.iter().position(|s| *s == style))
            .unwrap_or(0);

        Self {
            passage,
            output,
            state: State::StyleSelect,
            styles,
            style_index,
            budget_index: UNDERLINE_BUDGETS.len() - 1,
        }
    }
}

// Rendering logic
impl Menu {
    pub fn render(
        &self,
        frame: &mut ratatui::Frame,
        area: ratatui::prelude::Rect,
        config: &Config,
    ) {
        let area = center(area, Constraint::Percentage(80), Constraint::Percentage(80));

        match &self.state {
            State::StyleSelect => self.render_style_select(frame, area, config),
            State::BudgetSelect => self.render_budget_select(frame, area, config),
        }
    }

    pub fn handle_events(&mut self, event: &Event, config: &Config) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
        {
            return match self.state {
                State::StyleSelect => self.handle_style_select(key, config),
                State::BudgetSelect => self.handle_budget_select(key, config),
            };
        }

        None
    }

    fn render_style_select(
        &self,
        frame: &mut ratatui::Frame,
        area: ratatui::prelude::Rect,
        config: &Config,
    ) {
        let index = self.style_index;
        let items = self.styles.iter().enumerate().map(|(i, style)| {
            let mut selector = "  ";
            let line_style = if i == index {
                selector = "> ";
                Style::new()
                    .fg(config.settings.theme.text.highlight)
                    .reversed()
            } else {
                Style::new()
            };
            Line::from(Span::styled(format!("{selector}{style}"), line_style))
        });

        let list = List::new(items);
        let padding = centered_padding(area, Some(list.len() as u16 + 1), None);
        let area = Block::new().padding(padding).inner(area);

        frame.render_widget(list.block(Block::new().title("Select Quiz Style")), area);
    }

    fn render_budget_select(
        &self,
        frame: &mut ratatui::Frame,
        area: ratatui::prelude::Rect,
        config: &Config,
    ) {
        let index = self.budget_index;
        let items = UNDERLINE_BUDGETS.iter().enumerate().map(|(i, budget)| {
            let mut selector = "  ";
            let line_style = if i == index {
                selector = "> ";
                Style::new()
                    .fg(config.settings.theme.text.highlight)
                    .reversed()
            } else {
                Style::new()
            };
            Line::from(Span::styled(
                format!("{selector}{budget} spans"),
                line_style,
            ))
        });

        let list = List::new(items);
        let padding = centered_padding(area, Some(list.len() as u16 + 1), None);
        let area = Block::new().padding(padding).inner(area);

        frame.render_widget(
            list.block(Block::default().title("Select Span Budget")),
            area,
        );
    }
}

// Event handlers
impl Menu {
    fn handle_style_select(&mut self, key: &KeyEvent, config: &Config) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                increment_index(&mut self.style_index, self.styles.len());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                decrement_index(&mut self.style_index, self.styles.len());
            }
            KeyCode::Enter => {
                // SAFETY: The index is always within range of the `styles` Vec
                let style = self.styles[self.style_index];
                match style {
                    SelectionStyle::Square => {
                        return self.create_editor(config, style, SQUARE_BUDGET);
                    }
                    SelectionStyle::Underline => self.state = State::BudgetSelect,
                }
            }
            _ => (),
        };

        None
    }

    fn handle_budget_select(&mut self, key: &KeyEvent, config: &Config) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                increment_index(&mut self.budget_index, UNDERLINE_BUDGETS.len());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                decrement_index(&mut self.budget_index, UNDERLINE_BUDGETS.len());
            }
            KeyCode::Enter => {
                let budget = UNDERLINE_BUDGETS[self.budget_index];
                return self.create_editor(config, SelectionStyle::Underline, budget);
            }
            KeyCode::Backspace => self.state = State::StyleSelect,
            _ => (),
        };

        None
    }

    fn create_editor(
        &self,
        config: &Config,
        style: SelectionStyle,
        budget: usize,
    ) -> Option<Message> {
        let editor = Editor::new(
            config,
            self.passage.clone(),
            self.output.clone(),
            style,
            budget,
        );
        Some(Message::Show(editor.into()))
    }
}

const fn increment_index(index: &mut usize, len: usize) {
    *index = if *index == 0 { len - 1 } else { *index - 1 }
}

const fn decrement_index(index: &mut usize, len: usize) {
    *index = (*index + 1) % len
}
