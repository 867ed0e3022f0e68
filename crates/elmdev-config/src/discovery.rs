//! File-based config discovery.

use std::path::{Path, PathBuf};

/// Name of the optional project config file.
pub const CONFIG_FILE_NAME: &str = "elmdev.toml";

/// Prefix of environment overrides, e.g. `ELMDEV_SERVER__PORT=9090`.
pub const ENV_PREFIX: &str = "ELMDEV_";

/// Looks for `elmdev.toml` in a project root.
///
/// # Example
///
/// ```no_run
/// use elmdev_config::ConfigDiscovery;
///
/// if let Some(path) = ConfigDiscovery::new(".").find() {
///     println!("using {}", path.display());
/// }
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file if one exists in the root.
    pub fn find(&self) -> Option<PathBuf> {
        let path = self.root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }
}
