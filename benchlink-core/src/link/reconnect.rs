//! Automatic reconnection policy
//!
//! Evaluated from [`LinkManager::update`](super::LinkManager::update).
//! Retries are paced by a fixed delay and are not capped in number; the
//! retry counter exists for reporting only.

use super::events::DisconnectReason;
use super::machine::LinkState;

/// Fixed-delay retry policy
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReconnectPolicy {
    enabled: bool,
    delay_ms: u32,
    /// Time of the last join attempt or link loss, whichever is later
    last_attempt_ms: Option<u64>,
    retries: u32,
}

impl ReconnectPolicy {
    pub const fn new(enabled: bool, delay_ms: u32) -> Self {
        Self {
            enabled,
            delay_ms,
            last_attempt_ms: None,
            retries: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Automatic retries issued so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Restart the delay window at `now_ms`
    ///
    /// Called for every join attempt, manual or automatic, and when a
    /// connected link is found dropped.
    pub fn stamp(&mut self, now_ms: u64) {
        self.last_attempt_ms = Some(now_ms);
    }

    /// Check whether a retry is due
    ///
    /// A retry is due when the policy is enabled, the link is in a state
    /// worth retrying (a failed join, or a dropped session), credentials
    /// are stored, and the delay has elapsed since the last stamp.
    pub fn is_due(
        &self,
        state: LinkState,
        reason: DisconnectReason,
        has_ssid: bool,
        now_ms: u64,
    ) -> bool {
        if !self.enabled || !has_ssid {
            return false;
        }

        let retryable = match state {
            LinkState::ConnectionFailed => true,
            LinkState::Disconnected => reason == DisconnectReason::LinkLost,
            _ => false,
        };
        if !retryable {
            return false;
        }

        match self.last_attempt_ms {
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.delay_ms),
            None => true,
        }
    }

    /// Record that a retry is being issued at `now_ms`
    pub fn record_retry(&mut self, now_ms: u64) {
        self.retries = self.retries.saturating_add(1);
        self.stamp(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED: LinkState = LinkState::ConnectionFailed;
    const REQUESTED: DisconnectReason = DisconnectReason::Requested;

    #[test]
    fn test_waits_for_delay() {
        let mut policy = ReconnectPolicy::new(true, 1000);
        policy.stamp(0);

        assert!(!policy.is_due(FAILED, REQUESTED, true, 0));
        assert!(!policy.is_due(FAILED, REQUESTED, true, 500));
        assert!(!policy.is_due(FAILED, REQUESTED, true, 999));
        assert!(policy.is_due(FAILED, REQUESTED, true, 1000));
    }

    #[test]
    fn test_retry_restarts_window() {
        let mut policy = ReconnectPolicy::new(true, 1000);
        policy.stamp(0);
        policy.record_retry(1000);
        assert_eq!(policy.retries(), 1);
        assert!(!policy.is_due(FAILED, REQUESTED, true, 1500));
        assert!(policy.is_due(FAILED, REQUESTED, true, 2000));
    }

    #[test]
    fn test_disabled_or_no_ssid() {
        let disabled = ReconnectPolicy::new(false, 0);
        assert!(!disabled.is_due(FAILED, REQUESTED, true, 10_000));

        let enabled = ReconnectPolicy::new(true, 0);
        assert!(!enabled.is_due(FAILED, REQUESTED, false, 10_000));
        assert!(enabled.is_due(FAILED, REQUESTED, true, 10_000));
    }

    #[test]
    fn test_only_failed_or_lost_links_retry() {
        let policy = ReconnectPolicy::new(true, 0);
        let lost = DisconnectReason::LinkLost;

        assert!(policy.is_due(LinkState::Disconnected, lost, true, 0));
        assert!(!policy.is_due(LinkState::Disconnected, REQUESTED, true, 0));
        assert!(!policy.is_due(LinkState::Connected, lost, true, 0));
        assert!(!policy.is_due(LinkState::Connecting, lost, true, 0));
        assert!(!policy.is_due(LinkState::Scanning, lost, true, 0));
    }
}
