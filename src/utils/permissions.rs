use crate::error::{RageQuitError, Result};
use std::fs;
use tracing::{info, warn};

/// Verify access to the resources the real host needs before starting up.
pub fn check_permissions() -> Result<()> {
    info!("Checking access permissions...");

    check_input_devices_access()?;
    check_not_root();

    info!("Permission checks passed");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    let input_dir = "/dev/input";

    if !std::path::Path::new(input_dir).exists() {
        return Err(RageQuitError::Permission(format!(
            "Directory {} does not exist",
            input_dir
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Access to {} confirmed", input_dir);
            Ok(())
        }
        Err(e) => Err(RageQuitError::Permission(format!(
            "No access to {}: {}. Add your user to the 'input' group",
            input_dir, e
        ))),
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("Running as root!");
            warn!("Prefer adding your user to the 'input' group and running unprivileged:");
            warn!("  sudo usermod -a -G input $USER");
            warn!("  (then log in again)");
        }
        Ok(user) => {
            info!("Running as user: {}", user);
        }
        Err(_) => {
            warn!("Could not determine the current user");
        }
    }
}
