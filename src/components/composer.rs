use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

/// Result of a key press while the composer has focus.
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerOutcome {
    /// Enter: send the current message.
    Submit(String),
    /// Esc: give focus back, keeping the text.
    Blur,
}

/// Single-line message input.
pub struct Composer {
    pub focused: bool,
    input: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            focused: false,
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.cursor = self.input.chars().count();
    }

    pub fn message(&self) -> &str {
        &self.input
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// First visible character and the cursor column for a box `width` cells wide.
    /// The text scrolls left just enough to keep the cursor in view.
    fn visible_window(&self, width: usize) -> (usize, usize) {
        let start = self.cursor.saturating_sub(width.saturating_sub(1));
        (start, self.cursor - start)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ComposerOutcome> {
        if !self.focused {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(ComposerOutcome::Submit(self.input.clone())),
            KeyCode::Esc => {
                self.focused = false;
                Some(ComposerOutcome::Blur)
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index();
                    self.input.remove(idx);
                }
                None
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let idx = self.byte_index();
                    self.input.remove(idx);
                }
                None
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor < self.input.chars().count() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = self.input.chars().count();
                None
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if c == 'u' {
                        self.clear();
                    }
                } else {
                    let idx = self.byte_index();
                    self.input.insert(idx, c);
                    self.cursor += 1;
                }
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, enabled: bool) {
        let border_style = if self.focused {
            THEME.border_focused_style()
        } else {
            THEME.border_style()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Enter a message ")
            .style(Style::default().bg(THEME.surface));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (start, cursor_col) = self.visible_window(usize::from(inner.width));

        let display_text = if self.input.is_empty() {
            let hint = if enabled {
                "Press i to write a message..."
            } else {
                "Waiting for transaction..."
            };
            Span::styled(hint, THEME.muted_style())
        } else {
            let visible: String = self
                .input
                .chars()
                .skip(start)
                .take(usize::from(inner.width))
                .collect();
            Span::styled(visible, Style::default().fg(THEME.text))
        };
        frame.render_widget(Paragraph::new(display_text), inner);

        if self.focused {
            if let Some(cursor_x) = u16::try_from(cursor_col)
                .ok()
                .and_then(|col| inner.x.checked_add(col))
                .filter(|x| *x < inner.right())
            {
                frame.set_cursor_position((cursor_x, inner.y));
            }
        }
    }
}
