use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::centered_rect;
use crate::theme::THEME;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Wallet",
        &[
            ("c", "Connect wallet"),
            ("r", "Refresh wave count and list"),
        ],
    ),
    (
        "Waving",
        &[
            ("i / m", "Write a message"),
            ("Enter", "Send wave (while writing)"),
            ("Esc", "Stop writing"),
            ("w", "Wave with the current message"),
        ],
    ),
    (
        "Wave log",
        &[
            ("\u{2191}/k", "Move up"),
            ("\u{2193}/j", "Move down"),
            ("g / G", "Go to top / bottom"),
            ("e", "Export waves to CSV"),
            ("E", "Export waves to JSON"),
        ],
    ),
    (
        "Other",
        &[("?", "Toggle this help"), ("q", "Quit")],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_area = centered_rect(area, 60, 70);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let mut help_text = Vec::new();
        for (i, (title, keys)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, desc) in keys.iter() {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<9}"), Style::default().fg(THEME.text_accent)),
                    Span::styled(*desc, Style::default().fg(THEME.text)),
                ]));
            }
        }

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
