//! Message types for the dashboard protocol
//!
//! Message types are divided into two categories:
//! - Dashboard → Rig: commands
//! - Rig → Dashboard: status, channel samples, log lines, errors

use alloc::string::String;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command that asks the rig to de-energize every channel
pub const CMD_EMERGENCY_STOP: &str = "emergency_stop";

/// Keep-alive command sent by an idle dashboard
pub const CMD_PING: &str = "ping";

/// Messages from the dashboard to the rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Named command with free-form parameters
    Command {
        command: String,
        #[serde(default)]
        params: Value,
        /// Dashboard clock at send time (ms)
        #[serde(default)]
        timestamp: u64,
    },
}

impl ClientMessage {
    /// Name of the carried command
    pub fn command(&self) -> &str {
        match self {
            ClientMessage::Command { command, .. } => command,
        }
    }

    /// Check if this is an emergency stop request
    pub fn is_emergency_stop(&self) -> bool {
        self.command() == CMD_EMERGENCY_STOP
    }
}

/// Log severity as shown by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Connectivity summary published to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub connected: bool,
    pub ssid: String,
    /// Dotted-quad address, absent while disconnected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Signal strength in dBm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i16>,
    pub uptime_ms: u64,
    pub attempts: u32,
}

/// Messages from the rig to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceMessage {
    /// Link and uptime summary
    Status(StatusReport),
    /// One measurement sample
    ChannelData {
        channel: u8,
        /// Volts
        voltage: f32,
        /// Amperes
        current: f32,
    },
    /// Forwarded log line
    Log {
        level: LogLevel,
        category: String,
        message: String,
    },
    /// Error report, e.g. for a rejected command
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_decode_command() {
        let json = r#"{"type":"command","command":"set_relay","params":{"channel":3,"on":true},"timestamp":1712}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        assert_eq!(msg.command(), "set_relay");
        let ClientMessage::Command {
            params, timestamp, ..
        } = msg;
        assert_eq!(timestamp, 1712);
        assert_eq!(params["channel"], 3);
        assert_eq!(params["on"], true);
    }

    #[test]
    fn test_decode_command_defaults() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"command","command":"emergency_stop"}"#).unwrap();
        assert!(msg.is_emergency_stop());
        let ClientMessage::Command {
            params, timestamp, ..
        } = msg;
        assert_eq!(params, Value::Null);
        assert_eq!(timestamp, 0);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"status","connected":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_log() {
        let msg = DeviceMessage::Log {
            level: LogLevel::Warn,
            category: "wifi".to_string(),
            message: "link lost".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"log","level":"warn","category":"wifi","message":"link lost"}"#
        );
    }

    #[test]
    fn test_encode_channel_data() {
        let msg = DeviceMessage::ChannelData {
            channel: 2,
            voltage: 3.5,
            current: 0.25,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"channel_data","channel":2,"voltage":3.5,"current":0.25}"#
        );
    }

    #[test]
    fn test_encode_status_omits_address_when_down() {
        let msg = DeviceMessage::Status(StatusReport {
            connected: false,
            ssid: "lab".to_string(),
            address: None,
            rssi: None,
            uptime_ms: 0,
            attempts: 2,
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"type":"status","connected":false,"ssid":"lab","uptime_ms":0,"attempts":2}"#
        );
    }
}
