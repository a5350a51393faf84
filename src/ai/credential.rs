use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// The single persisted credential: one API key in one file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, or `None` when nothing (or only whitespace) is stored.
    pub fn load(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let key = content.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores the trimmed key. Returns the stored value, or `None` if the
    /// input was blank and nothing was written.
    pub fn save(&self, key: &str) -> std::io::Result<Option<String>> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.path, key)?;
        Ok(Some(key.to_string()))
    }

    pub fn delete(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Stored key first, then the environment variable, else empty.
    pub fn initial_key(&self, env_var: &str) -> String {
        match self.load() {
            Ok(Some(key)) => return key,
            Ok(None) => {}
            Err(e) => log::warn!("cannot read {}: {}", self.path.display(), e),
        }
        std::env::var(env_var)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Writes `contents` readable by the owner only.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // an existing file keeps its old mode unless reset
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("keys").join("gemini-api-key"));
        (dir, store)
    }

    #[test]
    fn save_load_delete() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);

        assert_eq!(store.save("  abc123 \n").unwrap().as_deref(), Some("abc123"));
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));

        store.delete().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // deleting twice is fine
        store.delete().unwrap();
    }

    #[test]
    fn blank_key_is_not_written() {
        let (_dir, store) = store();
        store.save("old").unwrap();
        assert_eq!(store.save("   ").unwrap(), None);
        assert_eq!(store.load().unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn stored_key_wins_over_environment() {
        let (_dir, store) = store();
        let var = "SAT_GLOBE_TEST_KEY_STORED";
        std::env::set_var(var, "from-env");
        assert_eq!(store.initial_key(var), "from-env");

        store.save("from-file").unwrap();
        assert_eq!(store.initial_key(var), "from-file");
        std::env::remove_var(var);
    }

    #[test]
    fn missing_everything_is_empty() {
        let (_dir, store) = store();
        assert_eq!(store.initial_key("SAT_GLOBE_TEST_KEY_UNSET"), "");
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "old").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save("secret").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().as_deref(), Some("secret"));
    }
}
