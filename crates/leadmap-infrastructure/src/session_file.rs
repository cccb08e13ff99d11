//! On-disk persistence of the auth session.
//!
//! Lets a restarted client resume without asking for credentials again.

use std::path::{Path, PathBuf};

use leadmap_core::auth::AuthSession;
use leadmap_core::error::Result;

/// JSON file holding the last session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session. A missing or unreadable file is treated as no session.
    pub async fn load(&self) -> Result<Option<AuthSession>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(
                    "[SessionFile] Ignoring corrupt session file {:?}: {}",
                    self.path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Writes atomically (temp file + rename), readable by the owner only.
    pub async fn save(&self, session: &AuthSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&tmp, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Removes the stored session; absent file is fine.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
