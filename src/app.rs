use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;

use crate::components::Component;
use crate::components::alert::AlertPopup;
use crate::components::composer::{Composer, ComposerOutcome};
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::portal::PortalPanel;
use crate::components::status_bar::StatusBar;
use crate::components::wave_table::WaveTable;
use crate::data::PortalService;
use crate::data::types::ExportFormat;
use crate::events::{Action, AppEvent};
use crate::state::PortalState;
use crate::theme::THEME;

pub struct App {
    // Components
    header: Header,
    status_bar: StatusBar,
    help: HelpOverlay,
    alert: AlertPopup,
    composer: Composer,
    wave_table: WaveTable,

    // Data
    state: PortalState,
    service: Arc<PortalService>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    export_dir: PathBuf,

    // Loop
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn with_service(
        service: Arc<PortalService>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        tick_rate_ms: u64,
        export_dir: PathBuf,
    ) -> Self {
        let version = service.provider().version();
        Self {
            header: Header::new(service.wallet().label()),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            alert: AlertPopup::new(),
            composer: Composer::new(),
            wave_table: WaveTable::new(),
            state: PortalState::new(version),
            service,
            event_rx,
            export_dir,
            should_quit: false,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        // Pick up an already-authorized account, as a page load would
        self.service.check_if_wallet_is_connected();

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | portal panel | wave log (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(PortalPanel::height(&self.state)),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);
        PortalPanel::render(frame, chunks[1], &self.state, &self.composer);

        if self.state.shows_wave_table() {
            self.wave_table.render(frame, chunks[2]);
        } else if self.state.is_connected() && self.state.version.has_wave_list() {
            let empty = Paragraph::new(Span::styled(
                "No waves yet. Be the first!",
                THEME.muted_style(),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[2]);
        }

        self.status_bar.render(frame, chunks[3]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
        self.alert.render(frame, area);
    }

    fn handle_terminal_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only handle key press events (not release/repeat) for cross-platform compat
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.alert.handle_key(key) {
            return;
        }

        if self.help.handle_key(key) {
            return;
        }

        if self.composer.focused {
            self.handle_composer_key(key);
            return;
        }

        match Action::from_key(key) {
            Some(action) => self.handle_action(action),
            None => {
                if self.state.shows_wave_table() {
                    if let Some(event) = self.wave_table.handle_key(key) {
                        self.handle_app_event(event);
                    }
                }
            }
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) {
        match self.composer.handle_key(key) {
            Some(ComposerOutcome::Submit(message)) => {
                self.composer.focused = false;
                self.status_bar.composing = false;
                self.wave(message);
            }
            Some(ComposerOutcome::Blur) => {
                self.status_bar.composing = false;
            }
            None => {}
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.help.toggle(),
            Action::Connect => {
                if self.state.is_connected() {
                    self.status_bar.info_message = Some("Wallet already connected".to_string());
                } else {
                    self.status_bar.clear_messages();
                    self.service.connect_wallet();
                }
            }
            Action::Compose => {
                if !self.state.is_connected() {
                    self.status_bar.error_message = Some("Connect a wallet first".to_string());
                } else if self.state.version.has_messages() && !self.state.processing {
                    self.status_bar.clear_messages();
                    self.composer.focus();
                    self.status_bar.composing = true;
                }
            }
            Action::Wave => {
                let message = self.composer.message().to_string();
                self.wave(message);
            }
            Action::Refresh => {
                if self.state.is_connected() {
                    self.service.refresh();
                }
            }
            Action::Export(format) => self.export(format),
        }
    }

    fn wave(&mut self, message: String) {
        if !self.state.can_wave(&message) {
            if !self.state.is_connected() {
                self.status_bar.error_message = Some("Connect a wallet first".to_string());
            } else if !self.state.processing {
                self.status_bar.error_message = Some("Enter a message first".to_string());
            }
            return;
        }
        let Some(account) = self.state.account else {
            return;
        };

        self.state.start_wave();
        self.status_bar.clear_messages();
        self.status_bar.processing = true;
        self.service.send_wave(account, message);
    }

    fn export(&mut self, format: ExportFormat) {
        if self.state.waves.is_empty() {
            self.status_bar.error_message = Some("No waves to export".to_string());
            return;
        }
        self.service.export_waves(
            self.state.waves.as_slice().to_vec(),
            format,
            self.export_dir.clone(),
        );
    }

    fn sync_waves(&mut self) {
        self.wave_table.set_waves(self.state.waves.as_slice());
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AccountConnected(account) => {
                self.state.apply_accounts(&[account]);
                self.header.account = Some(account);
                self.status_bar.clear_messages();
            }
            AppEvent::NoAuthorizedAccount => {
                self.status_bar.info_message =
                    Some("No authorized account found. Press c to connect.".to_string());
            }
            AppEvent::AccountsChanged(accounts) => {
                self.state.apply_accounts(&accounts);
                self.header.account = self.state.account;
                if !self.state.is_connected() {
                    self.composer.clear();
                    self.composer.focused = false;
                    self.status_bar.composing = false;
                }
                self.sync_waves();
            }
            AppEvent::ChainChanged(chain_id) => {
                self.header.chain_id = Some(chain_id);
                self.header.chain_ok = false;
                self.service.handle_chain_changed(chain_id);
            }
            AppEvent::ChainVerified(chain_id) => {
                self.header.chain_id = Some(chain_id);
                self.header.chain_ok = true;
            }
            AppEvent::WrongChain(chain_id) => {
                self.header.chain_id = Some(chain_id);
                self.header.chain_ok = false;
            }
            AppEvent::WaveCountLoaded(count) => {
                self.state.wave_count = count;
            }
            AppEvent::WavesLoaded(waves) => {
                self.state.set_waves(waves);
                self.sync_waves();
            }
            AppEvent::NewWave(wave) => {
                if self.state.is_connected() && self.state.add_live_wave(wave) {
                    self.sync_waves();
                }
            }
            AppEvent::WaveSubmitted(hash) => {
                self.state.pending_tx = Some(hash);
            }
            AppEvent::WaveMined(receipt) => {
                self.state.finish_wave();
                self.composer.clear();
                self.status_bar.processing = false;
                let block = receipt
                    .block_number
                    .map(|n| format!(" in block {n}"))
                    .unwrap_or_default();
                self.status_bar.info_message = Some(format!(
                    "Wave mined{block} ({} gas)",
                    crate::utils::format_number(receipt.gas_used)
                ));
            }
            AppEvent::WaveFailed(msg) => {
                self.state.finish_wave();
                self.status_bar.processing = false;
                self.status_bar.error_message = Some(msg);
            }
            AppEvent::ListenerConnected => {
                self.status_bar.listener_connected = true;
            }
            AppEvent::ListenerDisconnected => {
                self.status_bar.listener_connected = false;
            }
            AppEvent::ExportComplete(msg) => {
                self.status_bar.info_message = Some(msg);
            }
            AppEvent::Alert(msg) => {
                self.alert.show(msg);
            }
            AppEvent::Error(msg) => {
                self.status_bar.error_message = Some(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, B256};
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::data::ExpectedChain;
    use crate::data::contract::{ContractVersion, DEFAULT_CONTRACT, DEFAULT_GAS_LIMIT};
    use crate::data::provider::PortalProvider;
    use crate::data::types::{Wave, WaveReceipt};
    use crate::data::wallet::Wallet;

    async fn test_app() -> (App, mpsc::UnboundedSender<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let provider = PortalProvider::connect(
            "http://127.0.0.1:1",
            &Wallet::Absent,
            DEFAULT_CONTRACT,
            ContractVersion::Current,
            DEFAULT_GAS_LIMIT,
        )
        .await
        .unwrap();
        let service = PortalService::new(
            provider,
            Wallet::Absent,
            ExpectedChain {
                chain_id: 4,
                name: "Rinkeby Test Network".to_string(),
            },
            tx.clone(),
        );
        let app = App::with_service(Arc::new(service), rx, 100, PathBuf::from("."));
        (app, tx)
    }

    fn sample_wave(seconds: u64) -> Wave {
        Wave::from_unix(Address::repeat_byte(0x22), seconds, "hey".to_string())
    }

    fn compose(app: &mut App, text: &str) {
        app.composer.focus();
        for c in text.chars() {
            app.composer
                .handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.composer.focused = false;
    }

    fn mined() -> WaveReceipt {
        WaveReceipt {
            tx_hash: B256::repeat_byte(0xab),
            block_number: Some(42),
            gas_used: 51_234,
        }
    }

    #[tokio::test]
    async fn test_new_wave_ignored_while_disconnected() {
        let (mut app, _tx) = test_app().await;
        app.handle_app_event(AppEvent::NewWave(sample_wave(10)));
        assert!(app.state.waves.is_empty());

        app.handle_app_event(AppEvent::AccountConnected(Address::repeat_byte(0x11)));
        app.handle_app_event(AppEvent::NewWave(sample_wave(10)));
        assert_eq!(app.state.waves.as_slice(), &[sample_wave(10)]);
    }

    #[tokio::test]
    async fn test_wave_mined_clears_message_and_processing() {
        let (mut app, _tx) = test_app().await;
        app.handle_app_event(AppEvent::AccountConnected(Address::repeat_byte(0x11)));
        compose(&mut app, "gm");
        app.state.start_wave();
        app.status_bar.processing = true;

        app.handle_app_event(AppEvent::WaveSubmitted(B256::repeat_byte(0xab)));
        assert_eq!(app.state.pending_tx, Some(B256::repeat_byte(0xab)));

        app.handle_app_event(AppEvent::WaveMined(mined()));
        assert!(!app.state.processing);
        assert!(!app.status_bar.processing);
        assert_eq!(app.state.pending_tx, None);
        assert_eq!(app.composer.message(), "");
        assert_eq!(
            app.status_bar.info_message.as_deref(),
            Some("Wave mined in block 42 (51,234 gas)")
        );
    }

    #[tokio::test]
    async fn test_wave_failed_keeps_message() {
        let (mut app, _tx) = test_app().await;
        app.handle_app_event(AppEvent::AccountConnected(Address::repeat_byte(0x11)));
        compose(&mut app, "gm");
        app.state.start_wave();
        app.status_bar.processing = true;

        app.handle_app_event(AppEvent::WaveFailed("transaction reverted".to_string()));
        assert!(!app.state.processing);
        assert!(!app.status_bar.processing);
        assert_eq!(app.composer.message(), "gm");
        assert_eq!(
            app.status_bar.error_message.as_deref(),
            Some("transaction reverted")
        );
        assert!(app.state.can_wave(app.composer.message()));
    }

    #[tokio::test]
    async fn test_accounts_cleared_disconnects() {
        let (mut app, _tx) = test_app().await;
        app.handle_app_event(AppEvent::AccountConnected(Address::repeat_byte(0x11)));
        app.handle_app_event(AppEvent::WaveCountLoaded(3));
        app.handle_app_event(AppEvent::WavesLoaded(vec![sample_wave(10)]));
        compose(&mut app, "gm");

        app.handle_app_event(AppEvent::AccountsChanged(vec![]));
        assert!(!app.state.is_connected());
        assert_eq!(app.state.wave_count, 0);
        assert!(app.state.waves.is_empty());
        assert_eq!(app.header.account, None);
        assert_eq!(app.composer.message(), "");
    }

    #[tokio::test]
    async fn test_wrong_chain_marks_header() {
        let (mut app, _tx) = test_app().await;
        app.handle_app_event(AppEvent::WrongChain(1));
        assert_eq!(app.header.chain_id, Some(1));
        assert!(!app.header.chain_ok);

        app.handle_app_event(AppEvent::ChainVerified(4));
        assert_eq!(app.header.chain_id, Some(4));
        assert!(app.header.chain_ok);
    }
}
