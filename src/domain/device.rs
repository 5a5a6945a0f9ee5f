use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// UI language of the companion app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "nl")]
    Nl,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            _ => Err(()),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Nl => write!(f, "nl"),
        }
    }
}

/// Persisted identity of this device towards the hub.
///
/// `device_id` is minted locally at the first successful registration and
/// never regenerated afterwards; `webhook_id` is hub-issued and may be
/// replaced on re-registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub webhook_id: Option<String>,
    #[serde(default)]
    pub is_registered: bool,
}

/// Registration state machine.
///
/// `Pending` is re-enterable from both `Failed` (retry) and `Registered`
/// (manual re-register, e.g. after token rotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationState {
    Unconfigured,
    Pending,
    Registered,
    Failed,
}

impl Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Device metadata submitted to the hub during registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub device_id: String,
    pub device_name: String,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub app_version: Option<String>,
}

impl DeviceMetadata {
    /// Collect metadata for the local machine.
    pub fn collect(device_id: String) -> Self {
        Self {
            device_id,
            device_name: crate::utils::helpers::device_hostname(),
            os_name: sysinfo::System::name(),
            os_version: sysinfo::System::os_version(),
            app_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
