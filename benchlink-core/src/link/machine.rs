//! Link state machine definition
//!
//! The association lifecycle is a pure function of the current state and a
//! trigger. [`LinkManager`](super::LinkManager) performs the radio calls and
//! feeds their outcome back in as triggers.

/// Association states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Not associated; initial state
    #[default]
    Disconnected,
    /// Join in progress
    Connecting,
    /// Associated with an address
    Connected,
    /// Teardown in progress
    Disconnecting,
    /// Last join attempt failed
    ConnectionFailed,
    /// Network scan in progress
    Scanning,
}

/// Inputs that move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Caller or reconnect policy asked to join
    ConnectRequested,
    /// Radio reported a successful join
    JoinSucceeded,
    /// Radio reported a failed or timed-out join
    JoinFailed,
    /// Caller asked to leave
    DisconnectRequested,
    /// Radio finished tearing the association down
    TeardownComplete,
    /// Polling found the link down while connected
    LinkDown,
    /// Scan started
    ScanStarted,
    /// Scan finished
    ScanFinished,
}

impl LinkState {
    /// Check if traffic can flow
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkState::Connected)
    }

    /// Process a trigger and return the next state
    ///
    /// Triggers that do not apply to the current state leave it unchanged.
    pub fn transition(self, trigger: Trigger) -> Self {
        use LinkState::*;
        use Trigger::*;

        match (self, trigger) {
            // Joining
            (Disconnected, ConnectRequested) => Connecting,
            (ConnectionFailed, ConnectRequested) => Connecting,
            (Connecting, JoinSucceeded) => Connected,
            (Connecting, JoinFailed) => ConnectionFailed,

            // Leaving
            (Connected, DisconnectRequested) => Disconnecting,
            (Disconnecting, TeardownComplete) => Disconnected,
            (ConnectionFailed, DisconnectRequested) => Disconnected,

            // Unexpected loss, detected by polling
            (Connected, LinkDown) => Disconnected,

            // Scanning only takes over an idle, disconnected radio
            (Disconnected, ScanStarted) => Scanning,
            (Scanning, ScanFinished) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_success_path() {
        let state = LinkState::default();
        assert_eq!(state, LinkState::Disconnected);

        let connecting = state.transition(Trigger::ConnectRequested);
        assert_eq!(connecting, LinkState::Connecting);

        let connected = connecting.transition(Trigger::JoinSucceeded);
        assert_eq!(connected, LinkState::Connected);
        assert!(connected.is_connected());
    }

    #[test]
    fn test_connect_failure_and_retry() {
        let failed = LinkState::Connecting.transition(Trigger::JoinFailed);
        assert_eq!(failed, LinkState::ConnectionFailed);

        let retry = failed.transition(Trigger::ConnectRequested);
        assert_eq!(retry, LinkState::Connecting);
    }

    #[test]
    fn test_disconnect_flow() {
        let leaving = LinkState::Connected.transition(Trigger::DisconnectRequested);
        assert_eq!(leaving, LinkState::Disconnecting);

        let done = leaving.transition(Trigger::TeardownComplete);
        assert_eq!(done, LinkState::Disconnected);

        // Abandoning a failed link stops at Disconnected
        let abandoned = LinkState::ConnectionFailed.transition(Trigger::DisconnectRequested);
        assert_eq!(abandoned, LinkState::Disconnected);
    }

    #[test]
    fn test_link_down_only_from_connected() {
        assert_eq!(
            LinkState::Connected.transition(Trigger::LinkDown),
            LinkState::Disconnected
        );

        let states = [
            LinkState::Disconnected,
            LinkState::Connecting,
            LinkState::ConnectionFailed,
            LinkState::Scanning,
        ];
        for state in states {
            assert_eq!(state.transition(Trigger::LinkDown), state);
        }
    }

    #[test]
    fn test_connect_ignored_while_busy() {
        let states = [
            LinkState::Connecting,
            LinkState::Disconnecting,
            LinkState::Scanning,
            LinkState::Connected,
        ];
        for state in states {
            assert_eq!(state.transition(Trigger::ConnectRequested), state);
        }
    }

    #[test]
    fn test_scan_does_not_disturb_association() {
        assert_eq!(
            LinkState::Disconnected.transition(Trigger::ScanStarted),
            LinkState::Scanning
        );
        assert_eq!(
            LinkState::Scanning.transition(Trigger::ScanFinished),
            LinkState::Disconnected
        );

        for state in [LinkState::Connected, LinkState::ConnectionFailed] {
            assert_eq!(state.transition(Trigger::ScanStarted), state);
        }
    }
}
