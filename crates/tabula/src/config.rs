use anyhow::Result;
use directories::ProjectDirs;
use linecore::SearchOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

const MIN_LINE_CAPACITY: usize = 16;
const MAX_LINE_CAPACITY: usize = 65536;
const MAX_UNDO_CAPACITY: usize = 100_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub editor: EditorConfig,
    #[serde(default)]
    pub undo: UndoConfig,
    #[serde(default)]
    pub search: SearchOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub use_spaces: bool,
    /// Initial gap-buffer capacity of every new line.
    #[serde(default = "default_line_capacity")]
    pub initial_line_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoConfig {
    pub capacity: usize,
}

fn default_line_capacity() -> usize {
    linecore::gap_buffer::DEFAULT_CAPACITY
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            use_spaces: true,
            initial_line_capacity: default_line_capacity(),
        }
    }
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            capacity: linecore::undo::DEFAULT_UNDO_CAPACITY,
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        let Some(config_path) = Self::config_path() else {
            return Ok(());
        };

        let mut config_to_save = self.clone();
        config_to_save.validate()?;

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create config directory: {} - {}",
                    parent.display(),
                    e
                )
            })?;
            log::debug!("Config directory exists or was created: {}", parent.display());
        }

        let content = serde_json::to_string_pretty(&config_to_save)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
        tokio::fs::write(&config_path, content).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to write config file: {} - {}",
                config_path.display(),
                e
            )
        })?;

        log::info!("Successfully saved config to: {}", config_path.display());
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
            has_issues = true;
        }

        let capacity = self.editor.initial_line_capacity;
        if !(MIN_LINE_CAPACITY..=MAX_LINE_CAPACITY).contains(&capacity) {
            let clamped = capacity.clamp(MIN_LINE_CAPACITY, MAX_LINE_CAPACITY);
            log::warn!("Invalid line capacity: {}, using {}", capacity, clamped);
            self.editor.initial_line_capacity = clamped;
            has_issues = true;
        }

        if self.undo.capacity == 0 || self.undo.capacity > MAX_UNDO_CAPACITY {
            let clamped = self.undo.capacity.clamp(1, MAX_UNDO_CAPACITY);
            log::warn!("Invalid undo capacity: {}, using {}", self.undo.capacity, clamped);
            self.undo.capacity = clamped;
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TABULA_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("TABULA_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "tabula", "tabula")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
