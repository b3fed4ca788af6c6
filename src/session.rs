//! Durable storage of the login session (`token` and `userId`).
//!
//! The session lives in `session.conf` next to the other config files, in
//! the same `key = value` format.

use std::path::{Path, PathBuf};

use crate::model::LoginResponse;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

impl From<LoginResponse> for Session {
    fn from(r: LoginResponse) -> Self {
        Self {
            token: r.token,
            user_id: r.user_id,
        }
    }
}

/// File-backed session store. A store without a path keeps nothing on disk.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the stored session, if any. Incomplete files count as no session.
    pub fn load(&self) -> Option<Session> {
        let contents = std::fs::read_to_string(self.path.as_ref()?).ok()?;
        let mut token = None;
        let mut user_id = None;
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            match k.trim() {
                "token" => token = Some(v.trim().to_string()),
                "user_id" | "userId" => user_id = Some(v.trim().to_string()),
                _ => {}
            }
        }
        match (token, user_id) {
            (Some(token), Some(user_id)) if !token.is_empty() => Some(Session { token, user_id }),
            _ => None,
        }
    }

    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let buf = format!(
            "# usermgmt-portal session\ntoken = {}\nuser_id = {}\n",
            session.token, session.user_id
        );
        write_private(path, buf.as_bytes())
    }

    pub fn clear(&self) -> std::io::Result<()> {
        match &self.path {
            Some(p) if p.exists() => std::fs::remove_file(p),
            _ => Ok(()),
        }
    }
}

/// The token grants API access, so the file is readable by its owner only.
fn write_private(path: &Path, buf: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        opts.mode(0o600);
        // mode only applies on creation
        if path.exists() {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    opts.open(path)?.write_all(buf)
}
