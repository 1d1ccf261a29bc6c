use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::errors::CoreError;

/// Tokens of the last signed-in remote session, persisted so a fresh
/// process can resume it instead of starting signed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Durable client-side preferences.
///
/// Two things persist across restarts: the guest-mode flag (read at
/// startup, written on guest entry/exit) and the session tokens of the
/// last sign-in (written by the gateway, restored at startup so session
/// retrieval has something to resume). Modeled as an injectable trait so
/// tests can start from any initial state instead of poking at ambient
/// global storage.
pub trait PrefsStore: Send + Sync {
    fn guest_mode(&self) -> bool;

    fn set_guest_mode(&self, on: bool) -> Result<(), CoreError>;

    fn session_tokens(&self) -> Option<StoredTokens>;

    fn set_session_tokens(&self, tokens: Option<StoredTokens>) -> Result<(), CoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    guest_mode: bool,

    #[serde(default)]
    session: Option<StoredTokens>,
}

/// JSON-file-backed preferences. Missing or unreadable files behave as
/// defaults; writes go through a sibling temp file and an atomic rename
/// so a crash mid-write cannot leave a truncated prefs file.
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> PrefsFile {
        let Ok(bytes) = std::fs::read(&self.path) else {
            return PrefsFile::default();
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    fn write(&self, prefs: &PrefsFile) -> Result<(), CoreError> {
        let bytes = serde_json::to_vec_pretty(prefs)?;
        let tmp = tmp_path(&self.path);
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl PrefsStore for FilePrefs {
    fn guest_mode(&self) -> bool {
        self.read().guest_mode
    }

    fn set_guest_mode(&self, on: bool) -> Result<(), CoreError> {
        let mut prefs = self.read();
        prefs.guest_mode = on;
        self.write(&prefs)
    }

    fn session_tokens(&self) -> Option<StoredTokens> {
        self.read().session
    }

    fn set_session_tokens(&self, tokens: Option<StoredTokens>) -> Result<(), CoreError> {
        let mut prefs = self.read();
        prefs.session = tokens;
        self.write(&prefs)
    }
}

/// In-memory preferences for tests; never touches disk, never fails.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    guest_mode: AtomicBool,
    session: Mutex<Option<StoredTokens>>,
}

impl MemoryPrefs {
    #[must_use]
    pub fn new(guest_mode: bool) -> Self {
        Self {
            guest_mode: AtomicBool::new(guest_mode),
            session: Mutex::new(None),
        }
    }
}

impl PrefsStore for MemoryPrefs {
    fn guest_mode(&self) -> bool {
        self.guest_mode.load(Ordering::Relaxed)
    }

    fn set_guest_mode(&self, on: bool) -> Result<(), CoreError> {
        self.guest_mode.store(on, Ordering::Relaxed);
        Ok(())
    }

    fn session_tokens(&self) -> Option<StoredTokens> {
        self.session.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_session_tokens(&self, tokens: Option<StoredTokens>) -> Result<(), CoreError> {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *session = tokens;
        Ok(())
    }
}
