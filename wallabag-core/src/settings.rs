//! YAML settings file.
//!
//! # Storage layout
//!
//! ```text
//! ~/.wallabag-sync/
//!   config.yaml   (settings, mode 0600, holds the access token)
//!   .synced       (JSON array of synced article ids)
//!   .sync.lock    (present only while a pass runs)
//! ```
//!
//! # API pattern
//!
//! File operations come in two forms:
//! - `fn_to(path, …)` / `load_from(path)`: an explicit settings file (`--config`)
//! - `fn_at(home, …)`: the default file under `home`; tests pass a `TempDir`
//!
//! [`home_dir`] resolves the real home for callers outside tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ArchiveFilter;

/// Environment variable that overrides `access_token` from the file.
pub const ACCESS_TOKEN_ENV: &str = "WALLABAG_ACCESS_TOKEN";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How article tags are rendered into the `{{tags}}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagFormat {
    /// `rust, deep work`
    #[default]
    Csv,
    /// `#rust #deep_work`
    Hashtag,
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFormat::Csv => write!(f, "csv"),
            TagFormat::Hashtag => write!(f, "hashtag"),
        }
    }
}

impl FromStr for TagFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(TagFormat::Csv),
            "hashtag" => Ok(TagFormat::Hashtag),
            other => Err(format!("unknown tag format '{other}'; expected: csv, hashtag")),
        }
    }
}

/// Everything a sync pass needs to know. Immutable for the duration of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the wallabag instance, e.g. `https://app.wallabag.it`.
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Root directory of the note vault.
    pub vault: PathBuf,
    /// Vault-relative folder for Markdown notes.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Vault-relative folder for PDF exports.
    #[serde(default = "default_pdf_folder")]
    pub pdf_folder: String,
    /// Vault-relative template path without the `.md` suffix. Empty = built-in.
    #[serde(default)]
    pub article_template: String,
    #[serde(default)]
    pub id_in_title: bool,
    #[serde(default)]
    pub download_as_pdf: bool,
    #[serde(default)]
    pub create_pdf_note: bool,
    #[serde(default)]
    pub archive_after_sync: bool,
    #[serde(default)]
    pub sync_archived: bool,
    #[serde(default = "default_true")]
    pub convert_html_to_markdown: bool,
    #[serde(default)]
    pub tag_format: TagFormat,
    /// Number of articles materialized at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Where `.synced` lives. Defaults to `~/.wallabag-sync/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

fn default_folder() -> String {
    "wallabag".to_string()
}

fn default_pdf_folder() -> String {
    "wallabag/pdf".to_string()
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Settings with every optional field at its default.
    pub fn new(server_url: impl Into<String>, vault: impl Into<PathBuf>) -> Self {
        Settings {
            server_url: server_url.into(),
            access_token: None,
            vault: vault.into(),
            folder: default_folder(),
            pdf_folder: default_pdf_folder(),
            article_template: String::new(),
            id_in_title: false,
            download_as_pdf: false,
            create_pdf_note: false,
            archive_after_sync: false,
            sync_archived: false,
            convert_html_to_markdown: true,
            tag_format: TagFormat::default(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            state_dir: None,
        }
    }

    /// Server URL without a trailing slash.
    pub fn server_base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Which articles a pass fetches.
    pub fn archive_filter(&self) -> ArchiveFilter {
        ArchiveFilter::from(self.sync_archived)
    }

    /// Vault-relative path of the user template, if one is configured.
    pub fn user_template_path(&self) -> Option<String> {
        let name = self.article_template.trim();
        if name.is_empty() {
            None
        } else {
            Some(format!("{name}.md"))
        }
    }

    /// Token from `WALLABAG_ACCESS_TOKEN`, falling back to the file.
    pub fn effective_access_token(&self) -> Option<String> {
        pick_token(std::env::var(ACCESS_TOKEN_ENV).ok(), self.access_token.as_deref())
    }

    /// Directory holding `.synced` and the pass lock.
    pub fn state_dir_at(&self, home: &Path) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| config_root(home))
    }

    /// Reject settings a sync pass cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "server_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "server_url",
                reason: format!("'{}' is not an http(s) URL", self.server_url),
            });
        }
        if !self.vault.is_dir() {
            return Err(ConfigError::Invalid {
                field: "vault",
                reason: format!("'{}' is not a directory", self.vault.display()),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn pick_token(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|t| !t.trim().is_empty())
        .or_else(|| configured.map(str::to_owned))
        .filter(|t| !t.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

/// `<home>/.wallabag-sync/`
pub fn config_root(home: &Path) -> PathBuf {
    home.join(".wallabag-sync")
}

/// `<home>/.wallabag-sync/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    config_root(home).join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load settings from an explicit file path.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `<home>/.wallabag-sync/config.yaml`.
pub fn load_at(home: &Path) -> Result<Settings, ConfigError> {
    load_from(&config_path_at(home))
}

/// Atomically save settings to `path`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp_path = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Save to `<home>/.wallabag-sync/config.yaml`.
pub fn save_at(home: &Path, settings: &Settings) -> Result<(), ConfigError> {
    save_to(&config_path_at(home), settings)
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Write a fresh, validated settings file at `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init_to(
    path: &Path,
    server_url: &str,
    vault: PathBuf,
    force: bool,
) -> Result<Settings, ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let settings = Settings::new(server_url.trim(), vault);
    settings.validate()?;
    save_to(path, &settings)?;
    Ok(settings)
}

/// `init_to` for `<home>/.wallabag-sync/config.yaml`.
pub fn init_at(
    home: &Path,
    server_url: &str,
    vault: PathBuf,
    force: bool,
) -> Result<Settings, ConfigError> {
    init_to(&config_path_at(home), server_url, vault, force)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
