//! The platform's playback devices
//!
//! On Windows, devices are read and switched through the AudioDeviceCmdlets
//! PowerShell module, whose `Index`/`ID` values are the ones `Set-AudioDevice`
//! accepts. Elsewhere devices are enumerated with cpal, which can report the
//! default device but cannot change it.

use crate::audio::device::{AudioBackend, Device, DeviceSelector};
use crate::error::AudioError;

#[cfg(not(windows))]
use self::host as platform;
#[cfg(windows)]
use self::cmdlets as platform;

/// [`AudioBackend`] for the machine the server runs on
#[derive(Debug)]
#[non_exhaustive]
pub struct SystemAudio;

impl SystemAudio {
    /// Check that the platform audio facility answers at all
    pub fn probe() -> Result<Self, AudioError> {
        platform::probe()?;
        Ok(Self)
    }
}

impl AudioBackend for SystemAudio {
    fn list_devices(&self) -> Result<Vec<Device>, AudioError> {
        platform::list()
    }

    fn default_device(&self) -> Result<Device, AudioError> {
        platform::default()
    }

    fn set_device(&self, selector: &DeviceSelector) -> Result<(), AudioError> {
        tracing::info!("Setting default playback device by {}", selector);
        platform::select(selector)
    }
}

/// cpal enumeration of output devices
#[cfg(not(windows))]
mod host {
    use cpal::traits::{DeviceTrait, HostTrait};

    use super::{AudioError, Device, DeviceSelector};
    use crate::audio::device::find_device;

    pub fn probe() -> Result<(), AudioError> {
        cpal::default_host()
            .output_devices()
            .map(|_| ())
            .map_err(|e| AudioError::HostUnavailable(e.to_string()))
    }

    pub fn list() -> Result<Vec<Device>, AudioError> {
        let host = cpal::default_host();
        let default_name = host.default_output_device().and_then(|d| d.name().ok());

        let devices = host
            .output_devices()
            .map_err(|e| AudioError::CpalError(e.to_string()))?;

        Ok(devices
            .filter_map(|device| device.name().ok())
            .enumerate()
            .map(|(index, name)| Device {
                index: index as u32,
                id: format!("output:{}", name),
                default: default_name.as_ref() == Some(&name),
                name,
            })
            .collect())
    }

    pub fn default() -> Result<Device, AudioError> {
        list()?
            .into_iter()
            .find(|d| d.default)
            .ok_or(AudioError::NoDefaultDevice)
    }

    pub fn select(selector: &DeviceSelector) -> Result<(), AudioError> {
        let devices = list()?;
        if find_device(&devices, selector).is_none() {
            return Err(AudioError::DeviceNotFound(selector.to_string()));
        }
        Err(AudioError::Unsupported)
    }

    #[cfg(test)]
    mod tests {
        use super::super::SystemAudio;
        use super::*;
        use crate::audio::AudioBackend;

        #[test]
        fn test_probe_then_select_never_switches() {
            let audio = match SystemAudio::probe() {
                Ok(audio) => audio,
                Err(AudioError::HostUnavailable(_)) => return,
                Err(e) => panic!("unexpected probe error: {e}"),
            };
            let result = audio.set_device(&DeviceSelector::Id("output:no such device".into()));
            assert!(matches!(
                result,
                Err(AudioError::DeviceNotFound(_) | AudioError::CpalError(_))
            ));
        }
    }
}

/// AudioDeviceCmdlets scripts and output parsing
pub mod cmdlets {
    use serde::Deserialize;

    use super::{AudioError, Device, DeviceSelector};

    pub const LIST_SCRIPT: &str = "Get-AudioDevice -List \
        | Where-Object { $_.Type -eq 'Playback' } \
        | Select-Object Index, ID, Name, Default \
        | ConvertTo-Json -Compress";

    pub const DEFAULT_SCRIPT: &str = "Get-AudioDevice -Playback \
        | Select-Object Index, ID, Name, Default \
        | ConvertTo-Json -Compress";

    pub const PROBE_SCRIPT: &str = "Get-Command Get-AudioDevice -ErrorAction Stop | Out-Null";

    /// `ConvertTo-Json` emits a bare object for a single result
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Device),
        Many(Vec<Device>),
    }

    pub fn parse_devices(output: &str) -> Result<Vec<Device>, AudioError> {
        let output = output.trim();
        if output.is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(output) {
            Ok(OneOrMany::One(device)) => Ok(vec![device]),
            Ok(OneOrMany::Many(devices)) => Ok(devices),
            Err(e) => Err(AudioError::CommandFailed(format!("unexpected output: {e}"))),
        }
    }

    pub fn parse_device(output: &str) -> Result<Device, AudioError> {
        parse_devices(output)?
            .into_iter()
            .next()
            .ok_or(AudioError::NoDefaultDevice)
    }

    /// Environment variable carrying a device ID into [`select_script`].
    /// IDs never appear in script text.
    pub const DEVICE_ID_VAR: &str = "AUDIO_DEVICE_ID";

    pub fn select_script(selector: &DeviceSelector) -> String {
        match selector {
            DeviceSelector::Index(index) => format!("Set-AudioDevice -Index {index} | Out-Null"),
            DeviceSelector::Id(_) => format!("Set-AudioDevice -ID $env:{DEVICE_ID_VAR} | Out-Null"),
        }
    }

    /// Environment the select script needs
    pub fn select_env(selector: &DeviceSelector) -> Vec<(&'static str, &str)> {
        match selector {
            DeviceSelector::Index(_) => Vec::new(),
            DeviceSelector::Id(id) => vec![(DEVICE_ID_VAR, id.as_str())],
        }
    }

    #[cfg(windows)]
    fn run(script: &str, env: &[(&str, &str)]) -> Result<String, AudioError> {
        let output = std::process::Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .envs(env.iter().copied())
            .output()
            .map_err(|e| AudioError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::CommandFailed(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    #[cfg(windows)]
    pub fn probe() -> Result<(), AudioError> {
        run(PROBE_SCRIPT, &[])
            .map(|_| ())
            .map_err(|_| AudioError::HostUnavailable("AudioDeviceCmdlets module is not installed".into()))
    }

    #[cfg(windows)]
    pub fn list() -> Result<Vec<Device>, AudioError> {
        parse_devices(&run(LIST_SCRIPT, &[])?)
    }

    #[cfg(windows)]
    pub fn default() -> Result<Device, AudioError> {
        parse_device(&run(DEFAULT_SCRIPT, &[])?)
    }

    #[cfg(windows)]
    pub fn select(selector: &DeviceSelector) -> Result<(), AudioError> {
        run(&select_script(selector), &select_env(selector))
            .map(|_| ())
            .map_err(|e| AudioError::SelectionFailed(e.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_single_object() {
            let devices =
                parse_devices(r#"{"Index":1,"ID":"{0.0.0.00000000}.{abc}","Name":"Speakers","Default":true}"#)
                    .unwrap();
            assert_eq!(devices.len(), 1);
            assert_eq!(devices[0].name, "Speakers");
            assert!(devices[0].default);
        }

        #[test]
        fn test_parse_array() {
            let output = r#"[{"Index":1,"ID":"a","Name":"Speakers","Default":true},
                             {"Index":2,"ID":"b","Name":"Headphones","Default":false}]"#;
            let devices = parse_devices(output).unwrap();
            assert_eq!(devices.iter().map(|d| d.index).collect::<Vec<_>>(), vec![1, 2]);
        }

        #[test]
        fn test_parse_empty_and_garbage() {
            assert!(parse_devices("  \r\n").unwrap().is_empty());
            assert!(matches!(parse_device(""), Err(AudioError::NoDefaultDevice)));
            assert!(matches!(parse_devices("Get-AudioDevice : not recognized"), Err(AudioError::CommandFailed(_))));
        }

        #[test]
        fn test_select_by_index() {
            let selector = DeviceSelector::Index(3);
            assert_eq!(select_script(&selector), "Set-AudioDevice -Index 3 | Out-Null");
            assert!(select_env(&selector).is_empty());
        }

        #[test]
        fn test_select_by_id_keeps_id_out_of_script() {
            for id in ["it's", "x\u{2019}; Start-Process calc; \u{2019}", "a\u{2018}b\u{201A}c\u{201B}", "$(calc)"] {
                let selector = DeviceSelector::Id(id.to_string());
                let script = select_script(&selector);
                assert_eq!(script, "Set-AudioDevice -ID $env:AUDIO_DEVICE_ID | Out-Null");
                assert!(!script.contains(id));
                assert_eq!(select_env(&selector), vec![(DEVICE_ID_VAR, id)]);
            }
        }
    }
}
