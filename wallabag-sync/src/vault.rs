//! Filesystem-backed [`NoteStore`] rooted at a vault directory.
//!
//! ## Write modes
//!
//! - `write` / `write_binary` — replace: write `<path>.wallabag.tmp`, then
//!   rename over the target (atomic on POSIX).
//! - `create` / `create_binary` — exclusive: open with `create_new`, so two
//!   writers racing on one path cannot clobber each other; the loser gets
//!   [`CreateOutcome::AlreadyExists`].
//!
//! Parent directories are created on demand for every write.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use wallabag_core::{CreateOutcome, NoteStore};

/// Canonical vault-relative form of `path`.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and
/// non-breaking spaces become plain spaces. The result never starts or
/// ends with `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .replace(['\u{00A0}', '\u{202F}'], " ")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Note store over a directory tree.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        VaultStore { root: root.into() }
    }

    /// Absolute location of a vault-relative path.
    ///
    /// Paths escaping the vault via `..` are rejected.
    pub fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            bail!("empty vault path");
        }
        if normalized.split('/').any(|seg| seg == "..") {
            bail!("path '{path}' escapes the vault");
        }
        Ok(self.root.join(normalized))
    }

    fn ensure_parent(target: &Path) -> anyhow::Result<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        Ok(())
    }

    fn replace(&self, path: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let target = self.resolve(path)?;
        Self::ensure_parent(&target)?;

        let tmp = PathBuf::from(format!("{}.wallabag.tmp", target.display()));
        std::fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = std::fs::rename(&tmp, &target) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("renaming onto {}", target.display()));
        }
        tracing::info!("wrote: {}", target.display());
        Ok(())
    }

    fn create_new(&self, path: &str, bytes: &[u8]) -> anyhow::Result<CreateOutcome> {
        let target = self.resolve(path)?;
        Self::ensure_parent(&target)?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("exists: {}", target.display());
                return Ok(CreateOutcome::AlreadyExists);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("creating {}", target.display()));
            }
        };
        if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = std::fs::remove_file(&target);
            return Err(e).with_context(|| format!("writing {}", target.display()));
        }
        tracing::info!("created: {}", target.display());
        Ok(CreateOutcome::Created)
    }
}

impl NoteStore for VaultStore {
    fn exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.resolve(path)?.exists())
    }

    fn read(&self, path: &str) -> anyhow::Result<String> {
        let target = self.resolve(path)?;
        std::fs::read_to_string(&target).with_context(|| format!("reading {}", target.display()))
    }

    fn write(&self, path: &str, content: &str) -> anyhow::Result<()> {
        self.replace(path, content.as_bytes())
    }

    fn write_binary(&self, path: &str, bytes: &[u8]) -> anyhow::Result<()> {
        self.replace(path, bytes)
    }

    fn create(&self, path: &str, content: &str) -> anyhow::Result<CreateOutcome> {
        self.create_new(path, content.as_bytes())
    }

    fn create_binary(&self, path: &str, bytes: &[u8]) -> anyhow::Result<CreateOutcome> {
        self.create_new(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_path("/wallabag//notes/"), "wallabag/notes");
        assert_eq!(normalize_path(r"wallabag\pdf\a.pdf"), "wallabag/pdf/a.pdf");
        assert_eq!(normalize_path("./a/./b.md"), "a/b.md");
        assert_eq!(normalize_path("a\u{00A0}b.md"), "a b.md");
    }

    #[test]
    fn resolve_rejects_parent_segments() {
        let store = VaultStore::new("/vault");
        assert!(store.resolve("../etc/passwd").is_err());
        assert!(store.resolve("").is_err());
        assert_eq!(store.resolve("a/b.md").unwrap(), PathBuf::from("/vault/a/b.md"));
    }

    #[test]
    fn create_writes_once_then_reports_existing() {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path());
        assert_eq!(store.create("notes/a.md", "first").unwrap(), CreateOutcome::Created);
        assert_eq!(store.create("notes/a.md", "second").unwrap(), CreateOutcome::AlreadyExists);
        assert_eq!(store.read("notes/a.md").unwrap(), "first");
    }

    #[test]
    fn write_replaces_and_cleans_tmp() {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path());
        store.write("x.md", "v1").unwrap();
        store.write("x.md", "v2").unwrap();
        assert_eq!(store.read("x.md").unwrap(), "v2");
        assert!(!tmp.path().join("x.md.wallabag.tmp").exists());
    }

    #[test]
    fn binary_roundtrip_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path());
        let bytes = [0x25, 0x50, 0x44, 0x46, 0x00, 0xff];
        assert_eq!(
            store.create_binary("wallabag/pdf/doc.pdf", &bytes).unwrap(),
            CreateOutcome::Created
        );
        assert_eq!(std::fs::read(tmp.path().join("wallabag/pdf/doc.pdf")).unwrap(), bytes);
        assert!(store.exists("wallabag//pdf/doc.pdf").unwrap());
    }

    #[test]
    fn read_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = VaultStore::new(tmp.path());
        let err = store.read("nope.md").unwrap_err();
        assert!(format!("{err:#}").contains("nope.md"));
    }
}
