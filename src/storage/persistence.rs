//! Token registry persistence
//!
//! Provides save/load functionality for the token manager.

use crate::token::TokenManager;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub tokens_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".erc20_data"),
            tokens_file: "tokens.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Token registry storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the tokens file path
    fn tokens_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.tokens_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.tokens_file, index))
    }

    /// Save the registry to disk
    pub fn save(&self, manager: &TokenManager) -> Result<(), StorageError> {
        let path = self.tokens_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self
            .config
            .data_dir
            .join(format!("{}.tmp", self.config.tokens_file));
        if let Err(e) = write_json(manager, &temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        // Atomic rename
        fs::rename(&temp_path, &path)?;
        log::debug!("Saved {} token(s) to {:?}", manager.count(), path);

        Ok(())
    }

    /// Load the registry from disk
    pub fn load(&self) -> Result<TokenManager, StorageError> {
        let path = self.tokens_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Tokens file not found".to_string(),
            ));
        }

        load_from_file(&path)
    }

    /// Load the registry, or start an empty one if nothing was saved yet
    pub fn load_or_default(&self) -> Result<TokenManager, StorageError> {
        if self.exists() {
            self.load()
        } else {
            Ok(TokenManager::new())
        }
    }

    /// Check if a saved registry exists
    pub fn exists(&self) -> bool {
        self.tokens_path().exists()
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                let next = self.backup_path(i + 1);
                fs::rename(&current, &next)?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<TokenManager, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        load_from_file(&backup_path)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|&i| self.backup_path(i).exists())
            .collect()
    }
}

/// Save the registry to a specific file path
pub fn save_to_file(manager: &TokenManager, path: &Path) -> Result<(), StorageError> {
    write_json(manager, path)
}

/// Write the registry as JSON, surfacing errors from the final flush
fn write_json(manager: &TokenManager, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manager)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Load the registry from a specific file path
///
/// Rejects files whose balances do not add up to the recorded supply.
pub fn load_from_file(path: &Path) -> Result<TokenManager, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let manager: TokenManager = serde_json::from_reader(reader)?;

    let broken = manager.inconsistent_tokens();
    if !broken.is_empty() {
        let list: Vec<String> = broken.iter().map(|a| a.to_string()).collect();
        return Err(StorageError::InvalidData(format!(
            "Balances do not match total supply for: {}",
            list.join(", ")
        )));
    }

    Ok(manager)
}
