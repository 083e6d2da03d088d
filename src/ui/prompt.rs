//! Single-choice prompts

use std::collections::VecDeque;
use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::{Terminal, TerminalOptions, Viewport};

/// One selectable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Value returned when picked
    pub name: String,
    /// Text shown to the operator
    pub label: String,
}

impl Choice {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Asks the operator to pick one of several choices.
///
/// `Ok(None)` means the prompt was cancelled.
pub trait Prompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> io::Result<Option<String>>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn select(&mut self, message: &str, choices: &[Choice]) -> io::Result<Option<String>> {
        (**self).select(message, choices)
    }
}

impl<P: Prompt + ?Sized> Prompt for Box<P> {
    fn select(&mut self, message: &str, choices: &[Choice]) -> io::Result<Option<String>> {
        (**self).select(message, choices)
    }
}

/// What a key press does to an open prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Stay,
    Pick(usize),
    Cancel,
}

fn handle_key(key: KeyEvent, selected: &mut usize, len: usize) -> Step {
    if key.kind == KeyEventKind::Release {
        return Step::Stay;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            *selected = selected.checked_sub(1).unwrap_or(len.saturating_sub(1));
            Step::Stay
        }
        KeyCode::Down | KeyCode::Char('j') => {
            *selected = if *selected + 1 >= len { 0 } else { *selected + 1 };
            Step::Stay
        }
        KeyCode::Enter => Step::Pick(*selected),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Step::Cancel,
        KeyCode::Esc | KeyCode::Char('q') => Step::Cancel,
        _ => Step::Stay,
    }
}

/// Restores cooked mode however the prompt exits
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Interactive list drawn inline below the transcript
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    fn draw(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        message: &str,
        choices: &[Choice],
        selected: usize,
    ) -> io::Result<()> {
        let items: Vec<ListItem> = choices
            .iter()
            .map(|choice| ListItem::new(Line::from(choice.label.clone())))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" {message} "))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        let mut state = ListState::default();
        state.select(Some(selected));
        terminal.draw(|frame| frame.render_stateful_widget(list, frame.size(), &mut state))?;
        Ok(())
    }
}

impl Prompt for TerminalPrompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> io::Result<Option<String>> {
        if choices.is_empty() {
            return Ok(None);
        }

        let height = u16::try_from(choices.len() + 1).unwrap_or(u16::MAX).min(12);
        let _raw = RawModeGuard::enable()?;
        let mut terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;

        let mut selected = 0;
        let step = loop {
            Self::draw(&mut terminal, message, choices, selected)?;
            if let Event::Key(key) = event::read()? {
                match handle_key(key, &mut selected, choices.len()) {
                    Step::Stay => {}
                    step => break step,
                }
            }
        };
        terminal.clear()?;

        Ok(match step {
            Step::Pick(idx) => choices.get(idx).map(|choice| choice.name.clone()),
            _ => None,
        })
    }
}

/// Answers prompts from a fixed list of picks, for scripted runs and tests.
///
/// Each pick is matched against choice names, then labels. A pick that
/// matches nothing cancels that prompt; an exhausted script cancels every
/// prompt after it.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    picks: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(picks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            picks: picks.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Messages of every prompt shown so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Picks not consumed yet
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> io::Result<Option<String>> {
        if choices.is_empty() {
            return Ok(None);
        }
        self.asked.push(message.to_string());
        let Some(pick) = self.picks.pop_front() else {
            return Ok(None);
        };
        let found = choices
            .iter()
            .find(|choice| choice.name == pick)
            .or_else(|| choices.iter().find(|choice| choice.label == pick));
        if found.is_none() {
            tracing::warn!(%pick, "scripted pick matches no choice");
        }
        Ok(found.map(|choice| choice.name.clone()))
    }
}
