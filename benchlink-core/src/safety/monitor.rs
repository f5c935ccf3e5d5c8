//! Safety monitor implementation
//!
//! Watches the wireless link, dashboard heartbeat, and emergency-stop
//! requests. Register the monitor as (part of) the link manager's observer
//! so link loss is seen synchronously.

use core::cell::Cell;

use benchlink_protocol::ClientMessage;

use crate::link::{DisconnectReason, LinkEvent, LinkObserver};

/// Safety thresholds
pub const HEARTBEAT_TIMEOUT_MS: u32 = 3000;
pub const MAX_MISSED_HEARTBEATS: u8 = 3;

/// Fault conditions, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Dashboard requested an emergency stop
    EmergencyStop,
    /// Wireless link dropped without being asked to
    LinkLost,
    /// Dashboard stopped sending
    DashboardSilent,
}

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Safety condition violated
    Fault(FaultKind),
}

/// Safety monitor for fault detection
///
/// Heartbeat supervision starts with the first message from the dashboard;
/// a rig nobody has talked to yet is not considered abandoned.
#[derive(Debug, Default)]
pub struct SafetyMonitor {
    emergency_stop: Cell<bool>,
    link_lost: Cell<bool>,
    /// Set once any dashboard message has arrived
    supervising: Cell<bool>,
    missed_heartbeats: Cell<u8>,
    /// Time since last heartbeat (ms)
    time_since_heartbeat_ms: Cell<u32>,
}

impl SafetyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heartbeat received
    pub fn heartbeat_received(&self) {
        self.supervising.set(true);
        self.missed_heartbeats.set(0);
        self.time_since_heartbeat_ms.set(0);
    }

    /// Account for a dashboard command
    ///
    /// Every command counts as a heartbeat. An emergency stop latches until
    /// [`clear_emergency_stop`](Self::clear_emergency_stop).
    pub fn handle_command(&self, msg: &ClientMessage) {
        self.heartbeat_received();
        if msg.is_emergency_stop() {
            warn!("safety: emergency stop requested");
            self.emergency_stop.set(true);
        }
    }

    pub fn clear_emergency_stop(&self) {
        self.emergency_stop.set(false);
    }

    /// Update time tracking
    ///
    /// # Arguments
    /// - `delta_ms`: Time elapsed since last update
    pub fn update_time(&self, delta_ms: u32) {
        if !self.supervising.get() {
            return;
        }

        let elapsed = self.time_since_heartbeat_ms.get().saturating_add(delta_ms);
        if elapsed >= HEARTBEAT_TIMEOUT_MS {
            self.missed_heartbeats
                .set(self.missed_heartbeats.get().saturating_add(1));
            self.time_since_heartbeat_ms.set(0);
        } else {
            self.time_since_heartbeat_ms.set(elapsed);
        }
    }

    /// Check all safety conditions
    ///
    /// Returns the highest-priority fault, or Ok if all conditions are normal.
    pub fn check(&self) -> SafetyStatus {
        if self.emergency_stop.get() {
            return SafetyStatus::Fault(FaultKind::EmergencyStop);
        }
        if self.link_lost.get() {
            return SafetyStatus::Fault(FaultKind::LinkLost);
        }
        if !self.is_dashboard_healthy() {
            return SafetyStatus::Fault(FaultKind::DashboardSilent);
        }
        SafetyStatus::Ok
    }

    pub fn is_dashboard_healthy(&self) -> bool {
        self.missed_heartbeats.get() < MAX_MISSED_HEARTBEATS
    }

    pub fn missed_heartbeats(&self) -> u8 {
        self.missed_heartbeats.get()
    }
}

impl LinkObserver for SafetyMonitor {
    fn on_link_event(&self, event: &LinkEvent) {
        match event {
            LinkEvent::Disconnected(DisconnectReason::LinkLost) => {
                warn!("safety: link lost");
                self.link_lost.set(true);
            }
            LinkEvent::Connected(_) | LinkEvent::Disconnected(DisconnectReason::Requested) => {
                self.link_lost.set(false);
            }
            _ => {}
        }
    }
}
