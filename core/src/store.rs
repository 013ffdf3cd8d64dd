//! Local credential store.
//!
//! # Design
//! The token and profile live under one key-value namespace and are always
//! written and cleared as a whole, so readers never observe a token without
//! its profile. The current record is published through a
//! `tokio::sync::watch` channel; observers get the composite value, not one
//! stream per field.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::types::{Credentials, Profile};

/// Name of the preferences namespace.
pub const PREFS_NAMESPACE: &str = "user_prefs";

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_ID_KEY: &str = "user_id";
pub const USER_EMAIL_KEY: &str = "user_email";
pub const FIRST_NAME_KEY: &str = "first_name";
pub const LAST_NAME_KEY: &str = "last_name";
pub const IS_LOGGED_IN_KEY: &str = "is_logged_in";

/// A key-value namespace that is read and replaced as a whole.
pub trait Preferences: Send + Sync {
    /// All entries currently stored.
    fn load(&self) -> StoreResult<Map<String, Value>>;

    /// Atomically replace every entry with `entries`.
    fn replace(&self, entries: Map<String, Value>) -> StoreResult<()>;
}

/// In-memory preferences for tests and hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: RwLock<Map<String, Value>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Map<String, Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl Preferences for MemoryPreferences {
    fn load(&self) -> StoreResult<Map<String, Value>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.clone())
    }

    fn replace(&self, entries: Map<String, Value>) -> StoreResult<()> {
        let mut current = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *current = entries;
        Ok(())
    }
}

/// Preferences kept in a JSON file, replaced via write-then-rename.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/user_prefs.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{PREFS_NAMESPACE}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Preferences for FilePreferences {
    fn load(&self) -> StoreResult<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(StoreError::Corrupt("expected a JSON object".to_string())),
            Err(e) => Err(StoreError::Corrupt(e.to_string())),
        }
    }

    fn replace(&self, entries: Map<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Owns the persisted credential record and publishes changes.
pub struct CredentialStore {
    backend: Box<dyn Preferences>,
    current: watch::Sender<Option<Credentials>>,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Open a store over `backend`, loading whatever record it holds.
    pub fn open(backend: impl Preferences + 'static) -> StoreResult<Self> {
        let entries = backend.load()?;
        let initial = decode(&entries);
        if initial.is_none() && !entries.is_empty() {
            warn!("discarding incomplete credential record");
        }
        let (current, _) = watch::channel(initial);
        Ok(Self {
            backend: Box::new(backend),
            current,
            write_lock: Mutex::new(()),
        })
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            backend: Box::new(MemoryPreferences::new()),
            current,
            write_lock: Mutex::new(()),
        }
    }

    /// Replace the whole record and mark the user as logged in.
    pub fn save(&self, credentials: &Credentials) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.backend.replace(encode(credentials))?;
        self.current.send_replace(Some(credentials.clone()));
        info!(user_id = credentials.user_id, "credentials saved");
        Ok(())
    }

    /// Remove every field. The live record is dropped first, so a failed
    /// backend write still leaves the store signed out.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.current.send_replace(None);
        self.backend.replace(Map::new())?;
        info!("credentials cleared");
        Ok(())
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|c| c.token.clone())
    }

    pub fn profile(&self) -> Option<Profile> {
        self.current.borrow().as_ref().map(Credentials::profile)
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Observe the composite record; the receiver sees every save and clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<Credentials>> {
        self.current.subscribe()
    }
}

fn encode(credentials: &Credentials) -> Map<String, Value> {
    let mut entries = Map::new();
    entries.insert(TOKEN_KEY.to_string(), Value::from(credentials.token.clone()));
    entries.insert(USER_ID_KEY.to_string(), Value::from(credentials.user_id));
    entries.insert(USER_EMAIL_KEY.to_string(), Value::from(credentials.email.clone()));
    entries.insert(FIRST_NAME_KEY.to_string(), Value::from(credentials.first_name.clone()));
    entries.insert(LAST_NAME_KEY.to_string(), Value::from(credentials.last_name.clone()));
    entries.insert(IS_LOGGED_IN_KEY.to_string(), Value::from(true));
    entries
}

/// All-or-nothing: any missing field means no record.
fn decode(entries: &Map<String, Value>) -> Option<Credentials> {
    if !entries.get(IS_LOGGED_IN_KEY)?.as_bool()? {
        return None;
    }
    let text = |key: &str| -> Option<String> { entries.get(key)?.as_str().map(str::to_string) };
    let token = text(TOKEN_KEY).filter(|t| !t.is_empty())?;
    Some(Credentials {
        token,
        user_id: entries.get(USER_ID_KEY)?.as_i64()?,
        email: text(USER_EMAIL_KEY)?,
        first_name: text(FIRST_NAME_KEY)?,
        last_name: text(LAST_NAME_KEY)?,
    })
}
