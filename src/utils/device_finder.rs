use crate::error::{RageQuitError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Find a suitable keyboard device for key-state polling.
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Using configured device: {:?}", path);
                Ok(path)
            } else {
                RageQuitError::device_not_found(format!(
                    "Configured device does not exist: {:?}",
                    path
                ))
            };
        }

        Self::auto_find_keyboard()
    }

    fn auto_find_keyboard() -> Result<PathBuf> {
        info!("Auto-detecting a keyboard device...");

        if let Ok(device) = Self::find_by_id() {
            info!("Found device via by-id: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Found device via event scan: {:?}", device);
            return Ok(device);
        }

        RageQuitError::device_not_found(
            "No usable keyboard device found. \
             Make sure your user is in the 'input' group",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("/dev/input/by-id does not exist");
            return RageQuitError::device_not_found("by-id directory not found");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| RageQuitError::Permission(format!("No access to /dev/input/by-id: {}", e)))?;

        let mut keyboards = Vec::new();

        for entry in entries {
            let entry = entry.map_err(RageQuitError::Io)?;
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if !(name.contains("kbd") || name.contains("keyboard")) || !name.contains("event") {
                continue;
            }

            if !Self::is_device_accessible(&path) {
                debug!("Device {:?} not accessible", path);
                continue;
            }

            if Self::is_keyboard_device(&path)? {
                // -event-kbd symlinks point at the primary keyboard node
                let priority = if name.ends_with("event-kbd") { 100 } else { 10 };
                keyboards.push((path, priority));
            }
        }

        keyboards.sort_by(|a, b| b.1.cmp(&a.1));

        if let Some((keyboard, _)) = keyboards.into_iter().next() {
            Ok(keyboard)
        } else {
            RageQuitError::device_not_found("No keyboard device found in by-id")
        }
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let input_dir = Path::new("/dev/input");

        let entries = fs::read_dir(input_dir)
            .map_err(|e| RageQuitError::Permission(format!("No access to /dev/input: {}", e)))?;

        let mut event_devices = Vec::new();

        for entry in entries {
            let entry = entry.map_err(RageQuitError::Io)?;
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if name.starts_with("event") {
                event_devices.push(path);
            }
        }

        event_devices.sort();

        for device_path in event_devices {
            debug!("Probing device: {:?}", device_path);

            if Self::is_keyboard_device(&device_path)? && Self::is_device_accessible(&device_path) {
                return Ok(device_path);
            }
        }

        RageQuitError::device_not_found("No accessible keyboard among the event devices")
    }

    fn is_keyboard_device(device_path: &Path) -> Result<bool> {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let device_name = device.name().unwrap_or("Unknown").to_lowercase();

                if device_name.contains("mouse")
                    || device_name.contains("touchpad")
                    || device_name.contains("trackpoint")
                {
                    debug!("Skipping pointer device: {:?} ({})", device_path, device_name);
                    return Ok(false);
                }

                let has_keys = device.supported_keys().map_or(false, |keys| {
                    let basic_keys = keys.contains(evdev::KeyCode::KEY_A)
                        && keys.contains(evdev::KeyCode::KEY_SPACE)
                        && keys.contains(evdev::KeyCode::KEY_ENTER);

                    // Real keyboards expose far more keys than media remotes
                    basic_keys && keys.iter().count() > 20
                });

                if has_keys {
                    debug!("Device {:?} looks like a keyboard ({})", device_path, device_name);
                }

                Ok(has_keys)
            }
            Err(e) => {
                debug!("Could not open device {:?}: {}", device_path, e);
                Ok(false)
            }
        }
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        fs::File::open(device_path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyboard_device_with_missing_path() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(result.is_err());
    }
}
