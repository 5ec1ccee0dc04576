use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::data::chains;
use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_id: Option<u64>,
    pub chain_ok: bool,
    pub account: Option<Address>,
    pub wallet_label: String,
}

impl Header {
    pub fn new(wallet_label: &str) -> Self {
        Self {
            chain_id: None,
            chain_ok: false,
            account: None,
            wallet_label: wallet_label.to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // Left: title, right: network and account
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(16), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(Span::styled(
            " \u{1f44b} WavePortal",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let network = match self.chain_id {
            Some(id) => {
                let style = if self.chain_ok {
                    Style::default().fg(THEME.text)
                } else {
                    Style::default().fg(THEME.warning)
                };
                Span::styled(
                    format!("{} ({})", chains::chain_name(id), chains::format_chain_id(id)),
                    style,
                )
            }
            None => Span::styled("No network", THEME.muted_style()),
        };

        let account = match self.account {
            Some(addr) => Span::styled(utils::truncate_address(&addr), THEME.address_style()),
            None => Span::styled("Not connected", THEME.muted_style()),
        };

        let info = Line::from(vec![
            network,
            Span::styled(" | ", THEME.muted_style()),
            Span::styled(self.wallet_label.as_str(), THEME.accent_style()),
            Span::styled(" | ", THEME.muted_style()),
            account,
            Span::raw(" "),
        ]);
        let info_paragraph = Paragraph::new(info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(info_paragraph, chunks[1]);
    }
}
