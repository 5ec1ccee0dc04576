use alloy::primitives::{Address, B256};

use crate::data::contract::ContractVersion;
use crate::data::types::{Wave, WaveLog};

/// Everything the page shows, mirrored from the wallet and the contract.
#[derive(Debug)]
pub struct PortalState {
    pub version: ContractVersion,
    pub account: Option<Address>,
    pub waves: WaveLog,
    pub wave_count: u64,
    pub processing: bool,
    pub pending_tx: Option<B256>,
}

impl PortalState {
    pub fn new(version: ContractVersion) -> Self {
        Self {
            version,
            account: None,
            waves: WaveLog::new(),
            wave_count: 0,
            processing: false,
            pending_tx: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Apply an `accountsChanged` notification. An empty list means the wallet disconnected.
    pub fn apply_accounts(&mut self, accounts: &[Address]) {
        match accounts.first() {
            Some(account) => {
                self.account = Some(*account);
            }
            None => {
                tracing::info!("wallet disconnected");
                self.account = None;
                self.waves.clear();
                self.wave_count = 0;
            }
        }
    }

    /// Waving is allowed when connected, idle, and (if the contract takes one) with a message.
    pub fn can_wave(&self, message: &str) -> bool {
        if !self.is_connected() || self.processing {
            return false;
        }
        !self.version.has_messages() || !message.trim().is_empty()
    }

    pub fn start_wave(&mut self) {
        self.processing = true;
        self.pending_tx = None;
    }

    pub fn finish_wave(&mut self) {
        self.processing = false;
        self.pending_tx = None;
    }

    pub fn set_waves(&mut self, waves: Vec<Wave>) {
        self.waves.replace(waves);
    }

    pub fn add_live_wave(&mut self, wave: Wave) -> bool {
        self.waves.push_front(wave)
    }

    /// The wave table only shows for a connected account with at least one wave.
    pub fn shows_wave_table(&self) -> bool {
        self.is_connected() && !self.waves.is_empty()
    }

    pub fn wave_button_label(&self) -> &'static str {
        if self.processing {
            "Processing transaction..."
        } else {
            "Wave at Me"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected(version: ContractVersion) -> PortalState {
        let mut state = PortalState::new(version);
        state.apply_accounts(&[Address::repeat_byte(0x11)]);
        state
    }

    fn sample_wave(seconds: u64) -> Wave {
        Wave::from_unix(Address::repeat_byte(0x22), seconds, "hey".to_string())
    }

    #[test]
    fn test_starts_disconnected() {
        let state = PortalState::new(ContractVersion::Current);
        assert!(!state.is_connected());
        assert!(!state.can_wave("hello"));
        assert!(!state.shows_wave_table());
    }

    #[test]
    fn test_accounts_changed_switches_account() {
        let mut state = connected(ContractVersion::Current);
        state.wave_count = 3;
        state.apply_accounts(&[Address::repeat_byte(0x33), Address::repeat_byte(0x44)]);
        assert_eq!(state.account, Some(Address::repeat_byte(0x33)));
        assert_eq!(state.wave_count, 3);
    }

    #[test]
    fn test_accounts_changed_empty_clears_everything() {
        let mut state = connected(ContractVersion::Current);
        state.wave_count = 7;
        state.set_waves(vec![sample_wave(1)]);
        state.apply_accounts(&[]);
        assert!(state.account.is_none());
        assert_eq!(state.wave_count, 0);
        assert!(state.waves.is_empty());
    }

    #[test]
    fn test_can_wave_requires_message() {
        let state = connected(ContractVersion::Current);
        assert!(!state.can_wave(""));
        assert!(!state.can_wave("   "));
        assert!(state.can_wave("gm"));
    }

    #[test]
    fn test_classic_waves_without_message() {
        let state = connected(ContractVersion::Classic);
        assert!(state.can_wave(""));
    }

    #[test]
    fn test_processing_blocks_waves() {
        let mut state = connected(ContractVersion::Current);
        state.start_wave();
        assert!(!state.can_wave("gm"));
        assert_eq!(state.wave_button_label(), "Processing transaction...");
        state.finish_wave();
        assert!(state.can_wave("gm"));
        assert_eq!(state.wave_button_label(), "Wave at Me");
    }

    #[test]
    fn test_wave_table_visibility() {
        let mut state = connected(ContractVersion::Current);
        assert!(!state.shows_wave_table());
        assert!(state.add_live_wave(sample_wave(10)));
        assert!(state.shows_wave_table());
        assert!(!state.add_live_wave(sample_wave(10)));
    }
}
