use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};
use crate::preset::FieldPreset;

/// Layers stacked on one hero surface, bottom to top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Fixed seed for reproducible layouts; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fallback tracing filter used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default = "default_layers")]
    pub layers: Vec<FieldPreset>,
}

fn default_layers() -> Vec<FieldPreset> {
    vec![FieldPreset::reactive(), FieldPreset::ambient()]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            log_filter: None,
            layers: default_layers(),
        }
    }
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FieldError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.layers.iter().try_for_each(FieldPreset::validate)
    }

    /// Seed for the layer at `index`; layers never share a random stream.
    pub fn layer_seed(&self, base: u64, index: usize) -> u64 {
        self.seed.unwrap_or(base).wrapping_add(index as u64)
    }
}
