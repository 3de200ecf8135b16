use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Padding},
};
use stilus::{SelectionStyle, render::RenderNode};

use crate::config::theme::Theme;

/// A block with a rounded border
pub const ROUNDED_BLOCK: Block = Block::bordered().border_type(BorderType::Rounded);

pub fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area_horizontal] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical])
        .flex(Flex::Center)
        .areas(area_horizontal);
    area
}

/// Padding that vertically (and optionally horizontally) centers content of a
/// known size
pub fn centered_padding(area: Rect, height: Option<u16>, width: Option<u16>) -> Padding {
    let top = height.map_or(0, |height| area.height.saturating_sub(height) / 2);
    let left = width.map_or(0, |width| area.width.saturating_sub(width) / 2);
    Padding::new(left, left, top, 0)
}

/// Total display height of `lines` when wrapped to the width of `area`
pub fn height_of_lines(lines: &[Line], area: Rect) -> u16 {
    let width = area.width.max(1) as usize;
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width) as u16)
        .sum()
}

/// Linearly fade `color` towards `onto` by `percent` (0.0 = unchanged)
pub fn fade(color: Color, onto: Color, percent: f32) -> Color {
    let (r1, g1, b1) = rgb_of(color);
    let (r2, g2, b2) = rgb_of(onto);
    let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * percent) as u8;
    Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
}

fn rgb_of(color: Color) -> (u8, u8, u8) {
    let indexed = match color {
        Color::Rgb(r, g, b) => return (r, g, b),
        Color::Indexed(index) => index,
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        Color::White => 15,
        Color::Reset => return (127, 127, 127),
    };
    ansi_colours::rgb_from_ansi256(indexed)
}

/// A trait defining helper methods for keyevents
pub trait KeyEventHelper {
    /// Returns true if the keyevent contains a pressed key
    fn is_press(&self) -> bool;

    /// Returns true if the keyevent contains the given modifiers
    fn has_mods(&self, mods: KeyModifiers) -> bool;

    /// Returns true if the keyevent contains a character that matches the input
    fn is_char(&self, character: char) -> bool;

    /// Returns true if the keyevent matches the given character, and is being pressed
    fn is_press_char(&self, character: char) -> bool {
        self.is_press() && self.is_char(character)
    }

    /// Returns true if the keyevent matches the given character, and is being pressed with CTRL as
    /// a modifier.
    fn is_ctrl_press_char(&self, character: char) -> bool {
        self.has_mods(KeyModifiers::CONTROL) && self.is_press_char(character)
    }
}

impl KeyEventHelper for KeyEvent {
    fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }

    fn is_char(&self, character: char) -> bool {
        self.code == KeyCode::Char(character)
    }

    fn has_mods(&self, mods: KeyModifiers) -> bool {
        self.modifiers.contains(mods)
    }
}

/// How a projected passage should be styled
pub struct PassageView<'a> {
    pub theme: &'a Theme,
    pub style: SelectionStyle,
    /// Token index rendered as the cursor position
    pub cursor: Option<usize>,
    /// Span index rendered as the active substitute target
    pub target: Option<usize>,
    /// Fade unmarked tokens towards the background (preview mode)
    pub dim_plain: bool,
}

/// Turn a rendered node sequence into styled terminal lines
///
/// Newlines inside token text never reach ratatui - breaks are carried by the
/// dedicated nodes, so any leftover newline characters are stripped here.
pub fn passage_lines(nodes: &[RenderNode], view: &PassageView) -> Vec<Line<'static>> {
    let theme = view.theme;
    let plain_fg = if view.dim_plain {
        fade(theme.term_fg, theme.term_bg, 0.4)
    } else {
        theme.term_fg
    };

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for node in nodes {
        match node {
            RenderNode::LineBreak => lines.push(Line::from(std::mem::take(&mut current))),
            RenderNode::Token(token) => {
                let mut style = Style::new().fg(plain_fg);
                if token.pending {
                    style = style.bg(theme.mark.pending).fg(theme.term_bg);
                }
                if token.clickable && view.cursor == Some(token.index) {
                    style = style.reversed();
                }

                current.push(Span::styled(token.text.replace('\n', ""), style));
                if token.space_after {
                    current.push(Span::raw(" "));
                }
            }
            RenderNode::Marked(mark) => {
                if let Some(label) = &mark.label {
                    current.push(Span::styled(
                        format!("{label} "),
                        Style::new().fg(theme.mark.label).bold(),
                    ));
                }

                let color = if mark.substituted {
                    theme.mark.answer
                } else {
                    theme.mark.span
                };
                let mut style = Style::new().fg(color);
                if view.style == SelectionStyle::Underline {
                    style = style.underlined();
                }
                if view.target == Some(mark.span_index) {
                    style = style.reversed();
                }

                let title = match view.style {
                    SelectionStyle::Square => format!("[ {} ]", mark.title),
                    SelectionStyle::Underline => mark.title.clone(),
                };
                current.push(Span::styled(title.replace('\n', " "), style));
                current.push(Span::raw(" "));
            }
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }

    lines
}
