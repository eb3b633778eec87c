//! On-disk bearer-token store.
//!
//! The token is a single opaque string kept in a one-slot file. Reads probe
//! an ordered list of candidate locations and take the first hit; writes
//! always overwrite one canonical path. Concurrent CLI invocations racing on
//! the file are accepted (last writer wins).

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Token file name used for the working-directory and home-directory slots.
pub const TOKEN_FILE_NAME: &str = ".agora-token";

/// Single-slot durable store for the bearer token.
///
/// Read precedence: override path (if configured), then the
/// working-directory file, then the home-directory file. The write path is
/// the override when configured, otherwise the working-directory file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    candidates: Vec<PathBuf>,
    write_path: PathBuf,
}

impl TokenStore {
    /// Build a store from an optional override path, using the process
    /// working directory and the user's home directory for the fallbacks.
    #[must_use]
    pub fn from_override(override_path: Option<&Path>) -> Self {
        let cwd = std::env::current_dir()
            .map(|dir| dir.join(TOKEN_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(TOKEN_FILE_NAME));
        let home = dirs::home_dir().map(|dir| dir.join(TOKEN_FILE_NAME));

        let mut candidates = Vec::with_capacity(3);
        if let Some(path) = override_path {
            candidates.push(path.to_path_buf());
        }
        candidates.push(cwd.clone());
        if let Some(path) = home {
            candidates.push(path);
        }

        let write_path = override_path.map_or(cwd, Path::to_path_buf);
        Self {
            candidates,
            write_path,
        }
    }

    /// Build a store with explicit candidate and write paths.
    #[must_use]
    pub fn new(candidates: Vec<PathBuf>, write_path: PathBuf) -> Self {
        Self {
            candidates,
            write_path,
        }
    }

    /// Load the first token found among the candidate locations.
    ///
    /// Unreadable or empty candidates are skipped silently; probing misses
    /// are the one benign failure in the client.
    #[must_use]
    pub fn load(&self) -> Option<String> {
        for path in &self.candidates {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let token = content.trim();
                    if token.is_empty() {
                        continue;
                    }
                    debug!(path = %path.display(), "loaded cached token");
                    return Some(token.to_string());
                }
                Err(_) => continue,
            }
        }
        None
    }

    /// Persist the token, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write path is not writable.
    pub fn save(&self, token: &str) -> io::Result<()> {
        std::fs::write(&self.write_path, token)
    }

    /// The canonical write path.
    #[must_use]
    pub fn write_path(&self) -> &Path {
        &self.write_path
    }
}
