use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::PathBuf,
};

use tracing::{debug, warn};

use crate::error::LockError;

/// Exclusive ownership of an index directory for the duration of a build.
///
/// The lock file is created with `create_new`, so a second build against the
/// same directory fails instead of interleaving spill files. Released on drop.
#[derive(Debug)]
pub struct BuildLock {
    path: PathBuf,
}

impl BuildLock {
    pub fn acquire<P: Into<PathBuf>>(path: P) -> Result<Self, LockError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LockError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LockError::Held(path))
            }
            Err(source) => return Err(LockError::Io { path, source }),
        };

        // Owner pid, for whoever has to clear a stale lock by hand.
        if let Err(error) = writeln!(file, "{}", std::process::id()) {
            warn!(path = ?path, %error, "failed to record lock owner");
        }

        debug!(path = ?path, "build lock acquired");
        Ok(Self { path })
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path) {
            warn!(path = ?self.path, %error, "failed to release build lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{error::LockError, lock::BuildLock};

    #[test]
    fn test_lock_is_exclusive_and_released() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index").join("build.lock");

        let lock = BuildLock::acquire(&path).unwrap();
        let owner = fs::read_to_string(&path).unwrap();
        assert_eq!(owner.trim(), std::process::id().to_string());

        match BuildLock::acquire(&path) {
            Err(LockError::Held(held)) => assert_eq!(held, path),
            other => panic!("unexpected: {other:?}"),
        }

        drop(lock);
        assert!(!path.exists());
        assert!(BuildLock::acquire(&path).is_ok());
    }
}
