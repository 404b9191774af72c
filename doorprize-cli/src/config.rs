use doorprize_core::{DoorprizeError, Result};
use doorprize_draw::DrawTiming;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub default_winners: usize,
    pub bell_on_reveal: bool,
    pub timing: DrawTiming,
    /// Salted hash guarding import, clear and restore when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_winners: 3,
            bell_on_reveal: true,
            timing: DrawTiming::default(),
            admin_password: None,
        }
    }
}

impl CliConfig {
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doorprize")
    }

    /// Loads `config.json` from `data_dir`, writing the defaults on first use.
    pub async fn load_or_create(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);

        let config = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            let config = Self::default();
            config.save(data_dir).await?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        tokio::fs::write(&path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_winners == 0 {
            return Err(DoorprizeError::config("default_winners must be at least 1"));
        }

        self.timing
            .validate()
            .map_err(|e| DoorprizeError::config(e.to_string()))
    }
}
