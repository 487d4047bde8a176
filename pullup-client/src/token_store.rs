use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, error};

/// Where the session token lives between runs.
///
/// None of these operations fail outward. A read that goes wrong is the same as having no
/// token; writes and removals are best effort and only logged.
pub trait TokenStore: Send + Sync {
    fn set_token(&self, token: &str);
    fn token(&self) -> Option<String>;
    fn remove_token(&self);
}

/// Keeps the token in a single file, by default `$XDG_DATA_HOME/pullup/session`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn set_token(&self, token: &str) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs_err::create_dir_all(dir) {
                error!("Error storing auth token: {e}");
                return;
            }
        }
        match fs_err::write(&self.path, token.as_bytes()) {
            Ok(_) => debug!("stored session token at {:?}", self.path),
            Err(e) => error!("Error storing auth token: {e}"),
        }
    }

    fn token(&self) -> Option<String> {
        match fs_err::read_to_string(&self.path) {
            Ok(v) => {
                let v = v.trim();
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                error!("Error retrieving auth token: {e}");
                None
            }
        }
    }

    fn remove_token(&self) {
        match fs_err::remove_file(&self.path) {
            Ok(_) => debug!("removed session token at {:?}", self.path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!("Error removing auth token: {e}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_token(&self, token: &str) {
        match self.token.lock() {
            Ok(mut guard) => *guard = Some(token.to_string()),
            Err(e) => error!("Error storing auth token: {e}"),
        }
    }

    fn token(&self) -> Option<String> {
        match self.token.lock() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                error!("Error retrieving auth token: {e}");
                None
            }
        }
    }

    fn remove_token(&self) {
        match self.token.lock() {
            Ok(mut guard) => *guard = None,
            Err(e) => error!("Error removing auth token: {e}"),
        }
    }
}
