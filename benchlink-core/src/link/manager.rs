//! Wireless link manager
//!
//! Owns the radio, drives the [`LinkState`] machine from explicit requests
//! and from periodic polling, runs the [`ReconnectPolicy`], and publishes
//! every transition to the registered observer.
//!
//! All calls run on the application's polling loop. `connect` blocks for as
//! long as the radio's join does (bounded by the configured connect
//! timeout); there is no way to cancel a join in progress.

use core::net::Ipv4Addr;

use benchlink_hal::radio::MAX_SCAN_RESULTS;
use benchlink_hal::{AuthMode, Clock, JoinError, Radio};
use heapless::Vec;

use super::error::LinkError;
use super::events::{DisconnectReason, LinkEvent};
use super::machine::{LinkState, Trigger};
use super::notify::{LinkObserver, ScanObserver, Slot};
use super::reconnect::ReconnectPolicy;
use super::stats::LinkStats;
use crate::config::link::{push_truncated, LinkConfig};

/// Connection state machine over a [`Radio`]
pub struct LinkManager<'a, R, C> {
    radio: R,
    clock: C,
    config: LinkConfig,
    initialized: bool,
    state: LinkState,
    /// Present only while connected
    address: Option<Ipv4Addr>,
    rssi: Option<i16>,
    connected_at_ms: u64,
    attempts: u32,
    disconnect_reason: DisconnectReason,
    last_failure: Option<JoinError>,
    reconnect: ReconnectPolicy,
    observer: Slot<'a, dyn LinkObserver + 'a>,
    scan_observer: Slot<'a, dyn ScanObserver + 'a>,
}

impl<'a, R: Radio, C: Clock> LinkManager<'a, R, C> {
    /// Create a manager in the `Disconnected` state
    pub fn new(radio: R, clock: C, config: LinkConfig) -> Self {
        let reconnect = ReconnectPolicy::new(config.auto_reconnect, config.reconnect_delay_ms);
        Self {
            radio,
            clock,
            config,
            initialized: false,
            state: LinkState::Disconnected,
            address: None,
            rssi: None,
            connected_at_ms: 0,
            attempts: 0,
            disconnect_reason: DisconnectReason::Requested,
            last_failure: None,
            reconnect,
            observer: Slot::empty(),
            scan_observer: Slot::empty(),
        }
    }

    /// Bring the radio into station mode
    ///
    /// Applies the configured hostname. Calling this again is a no-op.
    pub fn init(&mut self) -> Result<(), LinkError> {
        if self.initialized {
            return Ok(());
        }
        if !self.config.hostname.is_empty() {
            self.radio.set_hostname(&self.config.hostname);
        }
        self.initialized = true;
        info!("link: initialized");
        Ok(())
    }

    /// Leave any network and stop managing the radio
    pub fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.teardown();
        self.initialized = false;
        info!("link: deinitialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Replace the whole configuration
    ///
    /// Takes effect on the next join; a changed hostname is applied to the
    /// radio immediately if the manager is initialized.
    pub fn configure(&mut self, config: LinkConfig) {
        let hostname_changed = config.hostname != self.config.hostname;
        self.reconnect.set_enabled(config.auto_reconnect);
        self.reconnect.set_delay_ms(config.reconnect_delay_ms);
        self.config = config;
        if self.initialized && hostname_changed && !self.config.hostname.is_empty() {
            self.radio.set_hostname(&self.config.hostname);
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Set the DHCP hostname
    pub fn set_hostname(&mut self, hostname: &str) -> Result<(), LinkError> {
        if hostname.is_empty() {
            return Err(LinkError::InvalidParam);
        }
        self.config.hostname.clear();
        push_truncated(&mut self.config.hostname, hostname);
        if self.initialized {
            self.radio.set_hostname(&self.config.hostname);
        }
        Ok(())
    }

    pub fn set_auto_reconnect(&mut self, enabled: bool) {
        self.config.auto_reconnect = enabled;
        self.reconnect.set_enabled(enabled);
    }

    /// Register the transition observer, returning the one it replaces
    pub fn set_observer(
        &mut self,
        observer: &'a (dyn LinkObserver + 'a),
    ) -> Option<&'a (dyn LinkObserver + 'a)> {
        self.observer.replace(Some(observer))
    }

    /// Remove the transition observer, returning it
    pub fn clear_observer(&mut self) -> Option<&'a (dyn LinkObserver + 'a)> {
        self.observer.replace(None)
    }

    /// Register the scan observer, returning the one it replaces
    pub fn set_scan_observer(
        &mut self,
        observer: &'a (dyn ScanObserver + 'a),
    ) -> Option<&'a (dyn ScanObserver + 'a)> {
        self.scan_observer.replace(Some(observer))
    }

    /// Remove the scan observer, returning it
    pub fn clear_scan_observer(&mut self) -> Option<&'a (dyn ScanObserver + 'a)> {
        self.scan_observer.replace(None)
    }

    /// Join `ssid`, blocking until the radio succeeds or gives up
    ///
    /// An empty `password` joins an open network. If already connected,
    /// the current session is torn down first. Returns the resulting state:
    /// `Connected`, or `ConnectionFailed` if the radio rejected the join.
    /// The credentials are kept for automatic retries either way.
    pub fn connect(&mut self, ssid: &str, password: &str) -> Result<LinkState, LinkError> {
        if !self.initialized {
            return Err(LinkError::NotInitialized);
        }
        if ssid.is_empty() {
            return Err(LinkError::InvalidParam);
        }

        if self.state.is_connected() {
            self.disconnect()?;
        }

        self.config.set_credentials(ssid, password);
        Ok(self.join())
    }

    /// Join the network held in the current configuration
    pub fn connect_configured(&mut self) -> Result<LinkState, LinkError> {
        if !self.initialized {
            return Err(LinkError::NotInitialized);
        }
        if !self.config.has_ssid() {
            return Err(LinkError::InvalidParam);
        }
        if self.state.is_connected() {
            self.disconnect()?;
        }
        Ok(self.join())
    }

    /// Leave the current network
    ///
    /// From `ConnectionFailed` this abandons the failed link and stops
    /// automatic retries. Does nothing when already disconnected.
    pub fn disconnect(&mut self) -> Result<(), LinkError> {
        if !self.initialized {
            return Err(LinkError::NotInitialized);
        }
        self.teardown();
        Ok(())
    }

    /// Leave the current network, whatever state the link is in
    fn teardown(&mut self) {
        match self.state {
            LinkState::Connected => {
                self.apply(Trigger::DisconnectRequested);
                self.notify(LinkEvent::Disconnecting);

                self.radio.leave();
                self.clear_session();
                self.disconnect_reason = DisconnectReason::Requested;

                self.apply(Trigger::TeardownComplete);
                self.notify(LinkEvent::Disconnected(DisconnectReason::Requested));
                info!("link: disconnected");
            }
            LinkState::ConnectionFailed => {
                self.radio.leave();
                self.disconnect_reason = DisconnectReason::Requested;
                self.apply(Trigger::DisconnectRequested);
                self.notify(LinkEvent::Disconnected(DisconnectReason::Requested));
            }
            LinkState::Disconnected => {
                // A lost link stays lost; stop retrying it
                self.disconnect_reason = DisconnectReason::Requested;
            }
            _ => {}
        }
    }

    /// Periodic work: poll the link and run the reconnect policy
    ///
    /// Call from the main loop. Does nothing before [`init`](Self::init).
    pub fn update(&mut self) {
        if !self.initialized {
            return;
        }

        if self.state.is_connected() {
            self.poll_link();
        }

        let now = self.clock.now_ms();
        if self.reconnect.is_due(
            self.state,
            self.disconnect_reason,
            self.config.has_ssid(),
            now,
        ) {
            self.reconnect.record_retry(now);
            info!(
                "link: reconnect attempt {} to {}",
                self.reconnect.retries(),
                self.config.ssid.as_str()
            );
            self.join();
        }
    }

    /// Enumerate visible networks
    ///
    /// Each network is passed to the scan observer; the last one carries
    /// `is_last = true`. A scan that finds nothing makes no calls. Returns
    /// the number of networks found.
    ///
    /// The state passes through `Scanning` and back without any
    /// [`LinkEvent`]; link observers only hear about association changes.
    pub fn scan(&mut self) -> Result<usize, LinkError> {
        if !self.initialized {
            return Err(LinkError::NotInitialized);
        }

        let mut results: Vec<_, MAX_SCAN_RESULTS> = Vec::new();
        self.apply(Trigger::ScanStarted);
        let outcome = self.radio.scan(&mut results);
        self.apply(Trigger::ScanFinished);
        outcome?;

        debug!("link: scan found {} networks", results.len());
        if let Some(observer) = self.scan_observer.get() {
            let count = results.len();
            for (i, result) in results.iter().enumerate() {
                observer.on_scan_result(result, i + 1 == count);
            }
        }
        Ok(results.len())
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Poll the radio and report whether the link is up
    ///
    /// A drop found here is handled exactly as in [`update`](Self::update).
    pub fn is_connected(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        if self.state.is_connected() {
            self.poll_link();
        }
        self.state.is_connected()
    }

    /// Address assigned by the network, while connected
    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    /// Stored network name
    pub fn ssid(&self) -> &str {
        &self.config.ssid
    }

    /// Signal strength in dBm from the last poll, while connected
    pub fn rssi(&self) -> Option<i16> {
        self.rssi
    }

    /// Why the link is (or last was) disconnected
    pub fn disconnect_reason(&self) -> DisconnectReason {
        self.disconnect_reason
    }

    /// Error from the most recent failed join
    pub fn last_failure(&self) -> Option<JoinError> {
        self.last_failure
    }

    pub fn reconnect_policy(&self) -> &ReconnectPolicy {
        &self.reconnect
    }

    /// Snapshot of the link counters
    pub fn stats(&self) -> LinkStats {
        let connected = self.state.is_connected();
        LinkStats {
            attempts: self.attempts,
            reconnects: self.reconnect.retries(),
            connected,
            rssi: self.rssi,
            uptime_ms: if connected {
                self.clock.elapsed_ms(self.connected_at_ms)
            } else {
                0
            },
            ssid: self.config.ssid.clone(),
            address: self.address,
        }
    }

    /// One join attempt with the stored credentials
    fn join(&mut self) -> LinkState {
        self.attempts = self.attempts.saturating_add(1);
        self.reconnect.stamp(self.clock.now_ms());

        self.apply(Trigger::ConnectRequested);
        self.notify(LinkEvent::Connecting);
        info!("link: joining {}", self.config.ssid.as_str());

        let auth = AuthMode::for_password(&self.config.password);
        let result = self.radio.join(
            &self.config.ssid,
            &self.config.password,
            auth,
            self.config.connect_timeout_ms,
        );

        match result {
            Ok(addr) => {
                self.address = Some(addr);
                self.connected_at_ms = self.clock.now_ms();
                self.rssi = self.radio.rssi();
                self.last_failure = None;
                self.apply(Trigger::JoinSucceeded);
                self.notify(LinkEvent::Connected(addr));
                info!("link: connected");
            }
            Err(err) => {
                self.clear_session();
                self.last_failure = Some(err);
                self.apply(Trigger::JoinFailed);
                self.notify(LinkEvent::ConnectionFailed(err));
                warn!("link: join failed: {}", err);
            }
        }
        self.state
    }

    /// Check a connected link and handle an unexpected drop
    fn poll_link(&mut self) {
        if self.radio.link_status().is_up() {
            self.rssi = self.radio.rssi();
            return;
        }

        warn!("link: lost");
        self.clear_session();
        self.disconnect_reason = DisconnectReason::LinkLost;
        // The retry delay counts from the loss
        self.reconnect.stamp(self.clock.now_ms());
        self.apply(Trigger::LinkDown);
        self.notify(LinkEvent::Disconnected(DisconnectReason::LinkLost));
    }

    fn clear_session(&mut self) {
        self.address = None;
        self.rssi = None;
    }

    fn apply(&mut self, trigger: Trigger) {
        self.state = self.state.transition(trigger);
    }

    fn notify(&self, event: LinkEvent) {
        if let Some(observer) = self.observer.get() {
            observer.on_link_event(&event);
        }
    }
}
