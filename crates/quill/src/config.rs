use anyhow::Result;
use bufcore::options::{DEFAULT_CREATE_MODE, DEFAULT_READ_BUFFER_CAPACITY};
use bufcore::EngineOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

const MIN_READ_BUFFER_CAPACITY: usize = 16;
const MAX_READ_BUFFER_CAPACITY: usize = 16 * 1024 * 1024;
const MAX_CREATE_MODE: u32 = 0o777;
const DEFAULT_NAME_WIDTH: usize = 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print the column header above the buffer table.
    pub show_header: bool,
    /// Buffer names longer than this are shortened from the left.
    pub max_name_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_header: true,
            max_name_width: DEFAULT_NAME_WIDTH,
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

                                // Keep the broken file around for the user to inspect
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
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Err(anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    ));
                }
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
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        let capacity = self.engine.read_buffer_capacity;
        if !(MIN_READ_BUFFER_CAPACITY..=MAX_READ_BUFFER_CAPACITY).contains(&capacity) {
            log::warn!("Invalid read buffer capacity: {}, using default", capacity);
            self.engine.read_buffer_capacity = DEFAULT_READ_BUFFER_CAPACITY;
            has_issues = true;
        }

        if self.engine.create_mode > MAX_CREATE_MODE {
            log::warn!(
                "Invalid create mode: {:o}, using default",
                self.engine.create_mode
            );
            self.engine.create_mode = DEFAULT_CREATE_MODE;
            has_issues = true;
        }

        if self.display.max_name_width < 8 || self.display.max_name_width > 512 {
            log::warn!(
                "Invalid name width: {}, using default",
                self.display.max_name_width
            );
            self.display.max_name_width = DEFAULT_NAME_WIDTH;
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("QUILL_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("QUILL_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "quill", "quill").map(|dirs| dirs.config_dir().join("config.json"))
    }
}
