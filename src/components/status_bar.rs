use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

pub struct StatusBar {
    pub error_message: Option<String>,
    pub info_message: Option<String>,
    pub processing: bool,
    pub listener_connected: bool,
    pub composing: bool,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            error_message: None,
            info_message: None,
            processing: false,
            listener_connected: false,
            composing: false,
        }
    }

    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.info_message = None;
    }

    fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
        [
            Span::styled(key, Style::default().fg(THEME.text_accent)),
            Span::styled(label, Style::default().fg(THEME.text_muted)),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(24)])
            .split(area);

        // --- Left side ---
        let left_content = if let Some(ref err) = self.error_message {
            Line::from(vec![
                Span::styled(
                    " ! ",
                    Style::default()
                        .fg(THEME.error)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.as_str(), Style::default().fg(THEME.warning)),
            ])
        } else if self.processing {
            Line::from(Span::styled(
                " Mining wave transaction...",
                Style::default().fg(THEME.text_accent),
            ))
        } else if let Some(ref info) = self.info_message {
            Line::from(Span::styled(format!(" {info}"), THEME.success_style()))
        } else if self.composing {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(Self::hint("Enter", ":Wave  "));
            spans.extend(Self::hint("Esc", ":Done"));
            Line::from(spans)
        } else {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(Self::hint("c", ":Connect  "));
            spans.extend(Self::hint("i", ":Message  "));
            spans.extend(Self::hint("w", ":Wave  "));
            spans.extend(Self::hint("r", ":Refresh  "));
            spans.extend(Self::hint("e", ":Export  "));
            spans.extend(Self::hint("?", ":Help  "));
            spans.extend(Self::hint("q", ":Quit"));
            Line::from(spans)
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        // --- Right side: event listener state ---
        let (dot_color, status_text) = if self.listener_connected {
            (THEME.success, "Live")
        } else {
            (THEME.text_muted, "Not listening")
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::raw(" "),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
