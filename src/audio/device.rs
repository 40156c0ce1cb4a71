//! Playback device model and the capability the API fronts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AudioError;

/// A playback device as reported to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Device {
    pub index: u32,
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub default: bool,
}

/// How a client picks the device to make default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelector {
    Index(u32),
    Id(String),
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSelector::Index(index) => write!(f, "index {index}"),
            DeviceSelector::Id(id) => write!(f, "id {id:?}"),
        }
    }
}

/// OS audio-device control.
///
/// Implementations may block; the HTTP layer calls them from
/// `spawn_blocking`.
pub trait AudioBackend: Send + Sync {
    fn list_devices(&self) -> Result<Vec<Device>, AudioError>;

    fn default_device(&self) -> Result<Device, AudioError>;

    fn set_device(&self, selector: &DeviceSelector) -> Result<(), AudioError>;
}

/// Find the device a selector refers to
pub fn find_device<'a>(devices: &'a [Device], selector: &DeviceSelector) -> Option<&'a Device> {
    devices.iter().find(|d| match selector {
        DeviceSelector::Index(index) => d.index == *index,
        DeviceSelector::Id(id) => d.id == *id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speakers() -> Device {
        Device {
            index: 1,
            id: "output:Speakers".into(),
            name: "Speakers".into(),
            default: true,
        }
    }

    #[test]
    fn test_device_json_shape() {
        let json = serde_json::to_value(speakers()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Index": 1, "ID": "output:Speakers", "Name": "Speakers", "Default": true})
        );
    }

    #[test]
    fn test_find_device() {
        let devices = vec![speakers()];
        assert!(find_device(&devices, &DeviceSelector::Index(1)).is_some());
        assert!(find_device(&devices, &DeviceSelector::Id("output:Speakers".into())).is_some());
        assert!(find_device(&devices, &DeviceSelector::Index(0)).is_none());
    }
}
