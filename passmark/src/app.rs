use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Padding};

use crate::config::Config;
use crate::page;
use crate::utils::ROUNDED_BLOCK;

const EMPTY_PASSAGE_ERROR: &str = r"The passage file is empty.
Point passmark at a file containing the passage text you want to mark up.";

/// How long a transient notice stays on screen
const NOTICE_SECONDS: u64 = 3;

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient status message
///
/// Fire-and-forget: pages emit these on the message channel and the app
/// renders them in the chrome for a few seconds. They are never part of a
/// page's own state.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// An app message
pub enum Message {
    /// An error occurred
    Error(Box<dyn std::error::Error + Send>),
    /// Show a transient status message
    Notify(Notice),
    /// Show a specific page
    Show(page::Page),
    /// Reset to the main menu
    Reset,
    /// Quit the application
    Quit,
}

/// The app itself
pub struct App {
    page: page::Page,
    config: Config,
    passage: String,
    output: PathBuf,
    notice: Option<(Notice, Instant)>,
}

impl App {
    /// Creates a new `App`
    pub fn new(config: Config, passage: String, output: PathBuf) -> Self {
        let page = if passage.trim().is_empty() {
            page::Error::new(EMPTY_PASSAGE_ERROR.to_string()).into()
        } else {
            page::Menu::new(&config, passage.clone(), output.clone()).into()
        };
        Self {
            page,
            config,
            passage,
            output,
            notice: None,
        }
    }

    /// Runs the app
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut terminal = ratatui::init();

        execute!(stdout(), SetCursorStyle::SteadyBar)?;

        loop {
            let event = event::poll(Duration::ZERO)?.then(event::read).transpose()?;
            if let Some(message) = self.handle_events(event) {
                match message {
                    Message::Error(error) => self.page = page::Error::from(error).into(),
                    Message::Notify(notice) => self.notice = Some((notice, Instant::now())),
                    Message::Show(page) => self.page = page,
                    Message::Reset => {
                        self.page = page::Menu::new(
                            &self.config,
                            self.passage.clone(),
                            self.output.clone(),
                        )
                        .into();
                    }
                    Message::Quit => break,
                }
            }
            terminal.draw(|frame| self.draw(frame))?;
        }

        ratatui::restore();

        Ok(())
    }

    /// Draws the next frame
    fn draw(&mut self, frame: &mut Frame) {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed() >= Duration::from_secs(NOTICE_SECONDS));
        if expired {
            self.notice = None;
        }

        let mut block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("PASSMARK".to_line().bold().centered())
            .title_top("<CTRL-Q> to exit".to_line().right_aligned());

        if let Some(top_msg) = self.page.render_top(&self.config) {
            block = block.title_top(top_msg);
        }

        if let Some((notice, _)) = &self.notice {
            let theme = &self.config.settings.theme;
            let color = match notice.level {
                NoticeLevel::Info => theme.text.highlight,
                NoticeLevel::Error => theme.text.error,
            };
            block = block.title_bottom(notice.title.to_line().fg(color).bold().centered());
        }

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);

        self.page.render(frame, content, &self.config);
    }

    /// Global event handler
    fn handle_events(&mut self, event_opt: Option<Event>) -> Option<Message> {
        event_opt.and_then(|event| {
            self.page.handle_events(&event, &self.config).or_else(|| {
                match event {
                    Event::Key(key) => self.handle_key_event(key),
                    _ => None, // Reserved for future event handling
                }
            })
        })
    }

    /// Global key events
    const fn handle_key_event(&self, key: KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Esc, KeyModifiers::NONE) => Some(Message::Reset),
            _ => None,
        }
    }
}
