//! Portal settings (`portal.conf`) and config directory resolution.
//!
//! All config files live in one directory, resolved in this order:
//! an explicit directory (CLI), `$XDG_CONFIG_HOME/usermgmt-portal`,
//! `$HOME/.config/usermgmt-portal`, then the working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::search::PAGE_SIZES;

pub const APP_DIR: &str = "usermgmt-portal";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory holding `portal.conf`, `theme.conf`, `keybinds.conf`,
/// `filter.conf` and `session.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigDir(PathBuf);

impl ConfigDir {
    /// Resolve the directory and make sure it exists.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let dir = explicit
            .map(Path::to_path_buf)
            .or_else(|| {
                std::env::var_os("XDG_CONFIG_HOME")
                    .filter(|v| !v.is_empty())
                    .map(|v| PathBuf::from(v).join(APP_DIR))
            })
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|v| PathBuf::from(v).join(".config").join(APP_DIR))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(%e, dir = %dir.display(), "cannot create config dir, using cwd");
            return Self(PathBuf::from("."));
        }
        Self(dir)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path of a file inside the config directory, as a string for the
    /// `load_or_init` helpers.
    pub fn file(&self, name: &str) -> String {
        self.0.join(name).to_string_lossy().into_owned()
    }
}

/// Connection and display settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    pub base_url: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: PAGE_SIZES[0],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PortalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Parse `key = value` lines. Unknown keys and unparsable values are ignored.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let rhs = rhs.trim();
            if rhs.is_empty() {
                continue;
            }
            match lhs.trim() {
                "base_url" => cfg.base_url = rhs.to_string(),
                "page_size" => {
                    if let Ok(n) = rhs.parse::<usize>()
                        && n > 0
                    {
                        cfg.page_size = n;
                    }
                }
                "timeout_secs" => {
                    if let Ok(n) = rhs.parse() {
                        cfg.timeout_secs = n;
                    }
                }
                _ => {}
            }
        }
        Some(cfg)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let buf = format!(
            "# usermgmt-portal settings\n\
             # Base URL of the portal API (no trailing slash)\n\
             base_url = {}\n\
             # Rows per page on the dashboard: 10|25|50|100\n\
             page_size = {}\n\
             # HTTP request timeout in seconds\n\
             timeout_secs = {}\n",
            self.base_url, self.page_size, self.timeout_secs
        );
        std::fs::write(path, buf)
    }

    pub fn load_or_init(path: &str) -> Self {
        if Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(e) = cfg.write_file(path) {
            tracing::debug!(%e, path, "could not write default portal.conf");
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_path(tag: &str) -> String {
        let mut p = std::env::temp_dir();
        let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("portal_{tag}_{}_{}.conf", std::process::id(), n));
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn parse_overrides_and_ignores_junk() {
        let path = tmp_path("cfg");
        std::fs::write(
            &path,
            "# c\nbase_url = https://portal.example\npage_size = 0\ntimeout_secs = 5\nnoise\ncolor = red\n",
        )
        .unwrap();
        let cfg = PortalConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.base_url, "https://portal.example");
        assert_eq!(cfg.page_size, PAGE_SIZES[0]);
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn load_or_init_writes_defaults() {
        let path = tmp_path("cfg_init");
        let cfg = PortalConfig::load_or_init(&path);
        assert_eq!(cfg, PortalConfig::default());
        assert_eq!(PortalConfig::from_file(&path), Some(PortalConfig::default()));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn explicit_dir_wins() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("portal_cfgdir_{}", std::process::id()));
        let resolved = ConfigDir::resolve(Some(&dir));
        assert_eq!(resolved.path(), dir.as_path());
        assert!(dir.is_dir());
        assert!(resolved.file("theme.conf").ends_with("theme.conf"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
