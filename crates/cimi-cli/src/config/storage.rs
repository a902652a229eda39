//! Profile storage in the user's configuration directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use super::Profile;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cimi").context("Could not determine config directory")?;

    let config_dir = dirs.config_dir();
    fs::create_dir_all(config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("config.json"))
}

/// Save a profile to disk, readable by the owner only.
pub fn save_profile(profile: &Profile) -> Result<PathBuf> {
    let path = config_path()?;
    let json = serde_json::to_string_pretty(profile)?;

    fs::write(&path, &json).context("Failed to write config file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Load the stored profile, if any.
pub fn load_profile() -> Result<Option<Profile>> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    let profile = serde_json::from_str(&json).context("Invalid config file")?;

    Ok(Some(profile))
}
