use alloy::primitives::{Address, B256};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::data::types::{ExportFormat, Wave, WaveReceipt};

/// Global actions decoded from keys while no text input is focused.
/// Keys without an action fall through to the focused component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Connect,
    Compose,
    Wave,
    Refresh,
    Export(ExportFormat),
    ToggleHelp,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('c') => Some(Action::Connect),
            KeyCode::Char('i') | KeyCode::Char('m') => Some(Action::Compose),
            KeyCode::Char('w') | KeyCode::Enter => Some(Action::Wave),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('e') => Some(Action::Export(ExportFormat::Csv)),
            KeyCode::Char('E') => Some(Action::Export(ExportFormat::Json)),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            _ => None,
        }
    }
}

/// Events sent from background tasks to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Wallet
    AccountConnected(Address),
    NoAuthorizedAccount,
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
    ChainVerified(u64),
    WrongChain(u64),

    // Contract state
    WaveCountLoaded(u64),
    WavesLoaded(Vec<Wave>),
    NewWave(Wave),

    // Wave transaction lifecycle
    WaveSubmitted(B256),
    WaveMined(WaveReceipt),
    WaveFailed(String),

    // Event listener
    ListenerConnected,
    ListenerDisconnected,

    // Export
    ExportComplete(String),

    // Status
    Alert(String),
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(Action::from_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Action::from_key(ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_plain_c_connects() {
        assert_eq!(Action::from_key(key(KeyCode::Char('c'))), Some(Action::Connect));
    }

    #[test]
    fn test_export_formats() {
        assert_eq!(
            Action::from_key(key(KeyCode::Char('e'))),
            Some(Action::Export(ExportFormat::Csv))
        );
        assert_eq!(
            Action::from_key(key(KeyCode::Char('E'))),
            Some(Action::Export(ExportFormat::Json))
        );
    }

    #[test]
    fn test_scroll_keys_left_to_components() {
        assert_eq!(Action::from_key(key(KeyCode::Down)), None);
        assert_eq!(Action::from_key(key(KeyCode::Char('k'))), None);
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(Action::from_key(key(KeyCode::Char('z'))), None);
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(Action::from_key(ctrl_x), None);
    }
}
