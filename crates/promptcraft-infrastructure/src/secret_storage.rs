//! Secret configuration file storage.
//!
//! Provides loading of API credentials from
//! `~/.config/promptcraft/secret.json`, and the [`CredentialGate`]
//! implementation backed by it.

use crate::paths::PromptCraftPaths;
use async_trait::async_trait;
use promptcraft_core::config::SecretConfig;
use promptcraft_core::credential::CredentialGate;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Configuration file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Storage for the secret configuration file (secret.json).
///
/// Responsibilities:
/// - Load secret.json from the PromptCraft config directory
/// - Parse JSON into the SecretConfig domain model
///
/// Does NOT:
/// - Write or modify secret files (read-only)
/// - Validate API keys against the provider
///
/// # Security Note
///
/// This storage reads plaintext JSON files. The secret.json file should
/// have appropriate file permissions (e.g., 600).
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a new SecretStorage with the default path.
    pub fn new() -> Result<Self, SecretStorageError> {
        let path =
            PromptCraftPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// [`CredentialGate`] backed by [`SecretStorage`].
///
/// A key counts as billable only when `billing_enabled` is set on it.
/// There is no interactive selection surface here, so `request_selection`
/// simply re-reads the file: the user is expected to have edited
/// secret.json out of band.
pub struct StoredCredentials {
    storage: SecretStorage,
}

impl StoredCredentials {
    pub fn new() -> Result<Self, SecretStorageError> {
        Ok(Self {
            storage: SecretStorage::new()?,
        })
    }

    pub fn with_storage(storage: SecretStorage) -> Self {
        Self { storage }
    }

    fn billable_from_file(&self) -> Option<String> {
        let config = self.storage.load().ok()?;
        let gemini = config.gemini?;
        if gemini.billing_enabled {
            Some(gemini.api_key)
        } else {
            tracing::debug!("[StoredCredentials] key present but not billing-enabled");
            None
        }
    }
}

#[async_trait]
impl CredentialGate for StoredCredentials {
    async fn billable_key(&self) -> Option<String> {
        self.billable_from_file()
    }

    async fn request_selection(&self) -> Option<String> {
        // Re-read in case the user updated the file since startup.
        self.billable_from_file()
    }
}
