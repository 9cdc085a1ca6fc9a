//! Locating `config.toml`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory under the config base that holds reelview's files.
const APP_DIR: &str = "reelview";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// `--dir` wins. Otherwise the file lives in `$XDG_CONFIG_HOME/reelview/`,
/// falling back to `~/.config/reelview/`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set and no
/// directory was given.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn config_path(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE));
    }
    let base = match xdg_config_home.filter(|value| !value.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => home
            .filter(|value| !value.is_empty())
            .map(|home| PathBuf::from(home).join(".config"))
            .context("neither XDG_CONFIG_HOME nor HOME is set")?,
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn os(value: &str) -> Option<OsString> {
        Some(OsString::from(value))
    }

    #[test]
    fn test_dir_flag_wins() {
        // Arrange
        let dir = Path::new("/srv/reelview-kiosk");

        // Act
        let path = config_path(Some(dir), os("/etc/xdg"), os("/home/viewer")).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/reelview-kiosk/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path = config_path(None, os("/home/viewer/.cfg"), os("/home/viewer")).unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/viewer/.cfg/reelview/config.toml"));
    }

    #[test]
    fn test_home_fallback_ignores_blank_xdg() {
        // Arrange & Act
        let path = config_path(None, os(""), os("/home/viewer")).unwrap();

        // Assert
        assert_eq!(
            path,
            PathBuf::from("/home/viewer/.config/reelview/config.toml")
        );
    }

    #[test]
    fn test_no_base_directory() {
        // Arrange & Act
        let err = config_path(None, None, None).unwrap_err();

        // Assert
        assert!(err.to_string().contains("XDG_CONFIG_HOME"));
    }
}
