//! Build information shown on development devices.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::DeviceConfig;
use crate::platform::path::expand;

/// Contents of the build-info file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildInfo {
    pub build_date: String,
}

impl BuildInfo {
    /// Loads build info for the configured device.
    ///
    /// Production devices, missing files, and unreadable files all yield an
    /// empty build date.
    #[must_use]
    pub fn load(device: &DeviceConfig) -> Self {
        if !device.development_device {
            return Self::default();
        }
        Self::read(&expand(&device.build_info_path))
    }

    fn read(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "no build info");
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "invalid build info");
            Self::default()
        })
    }
}
