use core::cell::{Cell, RefCell};
use core::net::Ipv4Addr;

use heapless::{String, Vec};

use crate::radio::{
    AuthMode, JoinError, LinkStatus, Radio, RadioError, ScanResult, HOSTNAME_MAX_LEN,
    MAX_SCAN_RESULTS, PASSWORD_MAX_LEN, SSID_MAX_LEN,
};

/// Parameters of the most recent join call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub ssid: String<SSID_MAX_LEN>,
    pub password: String<PASSWORD_MAX_LEN>,
    pub auth: AuthMode,
    pub timeout_ms: u32,
}

/// Simulated wireless station
///
/// `Radio` is implemented for `&MockRadio`, so a test can hand a shared
/// reference to the link manager and keep scripting the radio afterwards.
#[derive(Debug)]
pub struct MockRadio {
    join_result: Cell<Result<Ipv4Addr, JoinError>>,
    status: Cell<LinkStatus>,
    rssi: Cell<i16>,
    scan_result: Cell<Result<(), RadioError>>,
    networks: RefCell<Vec<ScanResult, MAX_SCAN_RESULTS>>,
    hostname: RefCell<String<HOSTNAME_MAX_LEN>>,
    last_join: RefCell<Option<JoinRequest>>,
    join_calls: Cell<u32>,
    leave_calls: Cell<u32>,
    scan_calls: Cell<u32>,
}

impl MockRadio {
    /// Radio whose joins succeed with 192.168.1.50
    pub fn new() -> Self {
        Self {
            join_result: Cell::new(Ok(Ipv4Addr::new(192, 168, 1, 50))),
            status: Cell::new(LinkStatus::Down),
            rssi: Cell::new(-55),
            scan_result: Cell::new(Ok(())),
            networks: RefCell::new(Vec::new()),
            hostname: RefCell::new(String::new()),
            last_join: RefCell::new(None),
            join_calls: Cell::new(0),
            leave_calls: Cell::new(0),
            scan_calls: Cell::new(0),
        }
    }

    /// Script the outcome of subsequent joins
    pub fn set_join_result(&self, result: Result<Ipv4Addr, JoinError>) {
        self.join_result.set(result);
    }

    /// Force the polled link status
    pub fn set_status(&self, status: LinkStatus) {
        self.status.set(status);
    }

    /// Simulate the access point going away
    pub fn drop_link(&self) {
        self.status.set(LinkStatus::Down);
    }

    /// Script the reported signal strength
    pub fn set_rssi(&self, rssi: i16) {
        self.rssi.set(rssi);
    }

    /// Add a network to future scan results
    pub fn add_network(&self, ssid: &str, rssi: i16, channel: u8, auth: AuthMode) {
        let mut name = String::new();
        let _ = name.push_str(ssid);
        let mut networks = self.networks.borrow_mut();
        let bssid = [0x02, 0x00, 0x00, 0x00, 0x00, networks.len() as u8];
        let _ = networks.push(ScanResult {
            ssid: name,
            bssid,
            rssi,
            channel,
            auth,
        });
    }

    /// Make the next scans fail
    pub fn set_scan_result(&self, result: Result<(), RadioError>) {
        self.scan_result.set(result);
    }

    /// Current scripted status
    pub fn status(&self) -> LinkStatus {
        self.status.get()
    }

    /// Hostname last applied
    pub fn hostname(&self) -> String<HOSTNAME_MAX_LEN> {
        self.hostname.borrow().clone()
    }

    /// Parameters of the last join call
    pub fn last_join(&self) -> Option<JoinRequest> {
        self.last_join.borrow().clone()
    }

    pub fn join_calls(&self) -> u32 {
        self.join_calls.get()
    }

    pub fn leave_calls(&self) -> u32 {
        self.leave_calls.get()
    }

    pub fn scan_calls(&self) -> u32 {
        self.scan_calls.get()
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl Radio for &MockRadio {
    fn join(
        &mut self,
        ssid: &str,
        password: &str,
        auth: AuthMode,
        timeout_ms: u32,
    ) -> Result<Ipv4Addr, JoinError> {
        self.join_calls.set(self.join_calls.get() + 1);

        let mut request = JoinRequest {
            ssid: String::new(),
            password: String::new(),
            auth,
            timeout_ms,
        };
        let _ = request.ssid.push_str(ssid);
        let _ = request.password.push_str(password);
        *self.last_join.borrow_mut() = Some(request);

        let result = self.join_result.get();
        self.status.set(match result {
            Ok(_) => LinkStatus::Up,
            Err(JoinError::BadAuth) => LinkStatus::BadAuth,
            Err(JoinError::NoNetwork) => LinkStatus::NoNetwork,
            Err(_) => LinkStatus::Fail,
        });
        result
    }

    fn leave(&mut self) {
        self.leave_calls.set(self.leave_calls.get() + 1);
        self.status.set(LinkStatus::Down);
    }

    fn link_status(&mut self) -> LinkStatus {
        self.status.get()
    }

    fn rssi(&mut self) -> Option<i16> {
        if self.status.get().is_up() {
            Some(self.rssi.get())
        } else {
            None
        }
    }

    fn set_hostname(&mut self, hostname: &str) {
        let mut name = self.hostname.borrow_mut();
        name.clear();
        let _ = name.push_str(hostname);
    }

    fn scan(&mut self, results: &mut Vec<ScanResult, MAX_SCAN_RESULTS>) -> Result<(), RadioError> {
        self.scan_calls.set(self.scan_calls.get() + 1);
        self.scan_result.get()?;
        for network in self.networks.borrow().iter() {
            if results.push(network.clone()).is_err() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_sets_status() {
        let radio = MockRadio::new();
        let mut handle = &radio;
        assert!(handle.join("bench", "", AuthMode::Open, 1000).is_ok());
        assert_eq!(radio.status(), LinkStatus::Up);
        assert_eq!(handle.rssi(), Some(-55));

        radio.set_join_result(Err(JoinError::BadAuth));
        assert_eq!(
            handle.join("bench", "wrong", AuthMode::Wpa2AesPsk, 1000),
            Err(JoinError::BadAuth)
        );
        assert_eq!(radio.status(), LinkStatus::BadAuth);
        assert_eq!(handle.rssi(), None);
        assert_eq!(radio.join_calls(), 2);
    }

    #[test]
    fn test_scan_reports_networks() {
        let radio = MockRadio::new();
        radio.add_network("lab", -40, 6, AuthMode::Wpa2AesPsk);
        radio.add_network("guest", -70, 11, AuthMode::Open);

        let mut handle = &radio;
        let mut results = Vec::new();
        handle.scan(&mut results).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ssid.as_str(), "lab");
        assert_eq!(results[1].auth, AuthMode::Open);
    }
}
