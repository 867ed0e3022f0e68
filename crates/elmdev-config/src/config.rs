//! Configuration model.
//!
//! `DevkitConfig` is split into one section per concern. Each section carries
//! serde defaults so a partial `elmdev.toml` only overrides what it names.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::discovery::{ConfigDiscovery, ENV_PREFIX};
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevkitConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Source and output locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the `*.html` pages copied verbatim
    #[serde(default = "default_html_dir")]
    pub html_dir: PathBuf,

    /// Directory holding the `*.elm` modules compiled into the bundle
    #[serde(default = "default_elm_dir")]
    pub elm_dir: PathBuf,

    /// Root of the recursive watch
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Output directory shared by the pipeline (writer) and the server (reader)
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// File name of the compiled bundle inside `out_dir`
    #[serde(default = "default_bundle")]
    pub bundle: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            html_dir: default_html_dir(),
            elm_dir: default_elm_dir(),
            watch_dir: default_watch_dir(),
            out_dir: default_out_dir(),
            bundle: default_bundle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Path prefix forwarded upstream (stripped before forwarding)
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Upstream base URL
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default)]
    pub on_error: ProxyErrorMode,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            target: default_target(),
            on_error: ProxyErrorMode::default(),
        }
    }
}

/// What the proxy does with the client request when the upstream call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProxyErrorMode {
    /// Log the error and never answer; the client waits until it times out.
    #[default]
    Abandon,
    /// Log the error and answer `502 Bad Gateway`.
    BadGateway,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// File extensions (without the dot) that trigger a rebuild
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Compiler executable, resolved through `PATH`
    #[serde(default = "default_program")]
    pub program: String,

    /// Run `<program> init` when the project has no `elm.json`
    #[serde(default = "default_true")]
    pub auto_init: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            auto_init: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Also raise an OS notification on build errors
    #[serde(default = "default_true")]
    pub desktop: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { desktop: true }
    }
}

impl DevkitConfig {
    /// Load configuration for the project rooted at `root`.
    ///
    /// Priority: environment (`ELMDEV_SECTION__FIELD`) > config file > defaults.
    /// `explicit` names a config file that must exist; without it `elmdev.toml`
    /// in `root` is used when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for a missing explicit file and
    /// `ConfigError::Extract` when a layer cannot be parsed.
    pub fn load(root: impl AsRef<Path>, explicit: Option<&Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path));
                }
                Some(path)
            }
            None => ConfigDiscovery::new(root).find(),
        };

        if let Some(path) = file {
            tracing::debug!("loading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract()?)
    }

    /// Parse configuration from TOML text layered over the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(content))
            .extract()?)
    }
}

fn default_html_dir() -> PathBuf {
    PathBuf::from("src/html")
}

fn default_elm_dir() -> PathBuf {
    PathBuf::from("src/elm")
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_bundle() -> String {
    "elm-app.js".into()
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_prefix() -> String {
    "/api".into()
}

fn default_target() -> String {
    "http://localhost:8000".into()
}

fn default_extensions() -> Vec<String> {
    vec!["elm".into(), "html".into()]
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_program() -> String {
    "elm".into()
}

fn default_true() -> bool {
    true
}
