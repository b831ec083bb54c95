//! Kasa request construction and reply parsing
//!
//! The sysinfo query doubles as the discovery payload and the liveness
//! check; relay commands share its envelope shape. Replies nest the
//! answer under `system.<command>` and signal failure with a non-zero
//! `err_code`.

use plugctl_core::{DeviceKind, Error, Result};
use serde::Deserialize;

/// Query for a device's identity and state
pub const SYSINFO_QUERY: &str = r#"{"system":{"get_sysinfo":{}}}"#;

/// Command switching the plug relay
pub fn set_relay_command(on: bool) -> String {
    format!(
        r#"{{"system":{{"set_relay_state":{{"state":{}}}}}}}"#,
        if on { 1 } else { 0 }
    )
}

/// The sysinfo fields this tool consumes
///
/// Devices report many more fields; unknown ones are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SysInfo {
    /// Human-assigned device name
    #[serde(default)]
    pub alias: String,

    /// Relay state: 1 = on, 0 = off
    #[serde(default)]
    pub relay_state: u8,

    /// Device type string on mains-powered models (e.g. "IOT.SMARTPLUGSWITCH")
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,

    /// Device type string on older firmware revisions
    #[serde(default)]
    pub mic_type: Option<String>,

    /// Non-zero when the device rejected the query
    #[serde(default)]
    pub err_code: i64,
}

impl SysInfo {
    /// Parse a decrypted sysinfo reply
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let reply: serde_json::Value = serde_json::from_slice(raw)?;
        let body = reply
            .get("system")
            .and_then(|system| system.get("get_sysinfo"))
            .ok_or_else(|| Error::protocol("reply has no system.get_sysinfo section"))?;

        let info: SysInfo = serde_json::from_value(body.clone())?;
        if info.err_code != 0 {
            return Err(Error::protocol(format!(
                "device rejected sysinfo query: err_code {}",
                info.err_code
            )));
        }

        Ok(info)
    }

    /// Kind of device this sysinfo describes, checked by the reported
    /// type string rather than by model table
    pub fn kind(&self) -> DeviceKind {
        let type_string = self
            .device_type
            .as_deref()
            .or(self.mic_type.as_deref())
            .unwrap_or_default();
        if type_string.to_ascii_uppercase().contains("SMARTPLUG") {
            DeviceKind::Plug
        } else {
            DeviceKind::Other
        }
    }

    /// Whether the relay is on
    pub fn is_on(&self) -> bool {
        self.relay_state == 1
    }
}

/// Check the err_code of a command reply nested under `system.<command>`
pub fn check_command_reply(raw: &[u8], command: &str) -> Result<()> {
    let reply: serde_json::Value = serde_json::from_slice(raw)?;
    let err_code = reply
        .get("system")
        .and_then(|system| system.get(command))
        .and_then(|body| body.get("err_code"))
        .and_then(|code| code.as_i64())
        .ok_or_else(|| Error::protocol(format!("reply has no system.{} err_code", command)))?;

    if err_code != 0 {
        return Err(Error::protocol(format!(
            "device rejected {}: err_code {}",
            command, err_code
        )));
    }
    Ok(())
}
