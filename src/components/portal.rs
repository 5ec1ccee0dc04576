use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::composer::Composer;
use crate::state::PortalState;
use crate::theme::THEME;
use crate::utils;

const BIO: &str = "Every wave is a transaction recorded by the WavePortal contract. \
Connect a wallet, leave a message, and it stays on-chain for everyone to see.";

/// The top panel: greeting, connect affordance or wave form, and the wave counter.
pub struct PortalPanel;

impl PortalPanel {
    pub fn height(state: &PortalState) -> u16 {
        let body = if !state.is_connected() {
            3
        } else if state.version.has_messages() {
            6
        } else {
            3
        };
        // borders, greeting, bio
        2 + 1 + 3 + body
    }

    pub fn render(frame: &mut Frame, area: Rect, state: &PortalState, composer: &Composer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let greeting = Paragraph::new(Span::styled(
            "\u{1f44b} Hey there!",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(greeting, chunks[0]);

        let bio = Paragraph::new(Span::styled(BIO, THEME.muted_style()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(bio, chunks[1]);

        if state.is_connected() {
            Self::render_wave_form(frame, chunks[2], state, composer);
        } else {
            Self::render_connect(frame, chunks[2]);
        }
    }

    fn render_connect(frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Connect your Ethereum wallet and wave at me!",
                Style::default().fg(THEME.text),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  [c] Connect Wallet  ",
                THEME.wave_button_style(true),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_wave_form(frame: &mut Frame, area: Rect, state: &PortalState, composer: &Composer) {
        let enabled = state.can_wave(composer.message());

        let mut constraints = Vec::new();
        if state.version.has_messages() {
            constraints.push(Constraint::Length(3));
        }
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = 0;
        if state.version.has_messages() {
            composer.render(frame, chunks[0], !state.processing);
            next = 1;
        }

        let button_text = if state.processing {
            format!("  {}  ", state.wave_button_label())
        } else {
            format!("  [w] {}  ", state.wave_button_label())
        };
        let button = Paragraph::new(Span::styled(button_text, THEME.wave_button_style(enabled)))
            .alignment(Alignment::Center);
        frame.render_widget(button, chunks[next + 1]);

        let mut counter = vec![Span::styled(
            format!("Total Number of Waves: {}", utils::format_number(state.wave_count)),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        )];
        if let Some(hash) = state.pending_tx {
            counter.push(Span::styled("  pending ", THEME.muted_style()));
            counter.push(Span::styled(utils::truncate_hash(&hash), THEME.hash_style()));
        }
        frame.render_widget(
            Paragraph::new(Line::from(counter)).alignment(Alignment::Center),
            chunks[next + 2],
        );
    }
}
