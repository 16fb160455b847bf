//! File-backed key/value store
//!
//! Each key is stored as `<dir>/<escaped key>.json`. Writes go to a
//! uniquely named temporary file in the same directory and are renamed into
//! place, so a reader never sees a half-written value. Every write to a key
//! holds that key's lock file (`.<escaped key>.json.lock`), which makes
//! [`KeyValueStore::compare_and_set`] atomic across threads and processes.

use crate::error::StoreError;
use crate::store::{check_quota, KeyValueStore};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::Builder;
use tracing::{debug, trace, warn};

const LOCK_RETRY_DELAY: Duration = Duration::from_millis(5);
const LOCK_ATTEMPTS: u32 = 2_000;
/// A lock older than this was left behind by a writer that died.
const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

/// Key/value store persisted as one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<u64>,
}

/// Escape `key` into a file name stem.
///
/// `[A-Za-z0-9_-]` and non-leading `.` are kept; every other byte becomes
/// `%XX`. The mapping is injective, so distinct keys never share a file,
/// and the result contains no path separator.
fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_')
            || (byte == b'.' && i > 0);
        if keep {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

/// Held while writing one key; removes the lock file on drop.
struct KeyLock {
    path: PathBuf,
}

impl KeyLock {
    fn acquire(path: PathBuf) -> Result<Self, StoreError> {
        for _ in 0..LOCK_ATTEMPTS {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(Self { path }),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    if Self::is_stale(&path) {
                        warn!("Breaking stale store lock {}", path.display());
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(err) => return Err(StoreError::Io(err)),
            }
        }
        Err(StoreError::Io(io::Error::new(
            ErrorKind::TimedOut,
            format!("timed out waiting for {}", path.display()),
        )))
    }

    fn is_stale(path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > STALE_LOCK_AGE)
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!("Failed to release store lock {}: {}", self.path.display(), err);
        }
    }
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Opened file store at {}", dir.display());
        Ok(Self { dir, quota: None })
    }

    /// Reject values larger than `quota` bytes.
    pub fn with_quota(mut self, quota: Option<u64>) -> Self {
        self.quota = quota;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    fn lock_for(&self, key: &str) -> Result<KeyLock, StoreError> {
        KeyLock::acquire(self.dir.join(format!(".{}.json.lock", escape_key(key))))
    }

    /// Write `value` to a fresh temp file and rename it over `key`'s file.
    /// The caller holds the key lock.
    fn replace(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let mut tmp = Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|err| StoreError::Io(err.error))?;
        trace!("file set {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                trace!("file get {} ({} bytes)", path.display(), contents.len());
                Ok(Some(contents))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_quota(key, value, self.quota)?;
        let _lock = self.lock_for(key)?;
        self.replace(key, value)
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<String>,
        value: &str,
    ) -> Result<bool, StoreError> {
        check_quota(key, value, self.quota)?;
        let _lock = self.lock_for(key)?;
        if self.get(key)? != expected {
            trace!("file compare_and_set {} lost the race", key);
            return Ok(false);
        }
        self.replace(key, value)?;
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _lock = self.lock_for(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
