use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::centered_rect;
use crate::theme::THEME;

/// Modal message box; any key dismisses it.
pub struct AlertPopup {
    pub message: Option<String>,
}

impl AlertPopup {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn show(&mut self, message: String) {
        self.message = Some(message);
    }

    #[cfg(test)]
    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        self.message.take().is_some()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref message) = self.message else {
            return;
        };

        let popup_area = centered_rect(area, 50, 30);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(THEME.error_style())
            .style(Style::default().bg(THEME.surface));

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message.as_str(), Style::default().fg(THEME.text))),
            Line::from(""),
            Line::from(Span::styled("Press any key to dismiss", THEME.muted_style())),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
