//! Audio device capability

pub mod device;
pub mod system;

pub use device::{AudioBackend, Device, DeviceSelector};
pub use system::SystemAudio;
