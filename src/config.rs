use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("model needs at least one question weight")]
    NoQuestions,
    #[error("weight for question {question} must be finite and positive, got {weight}")]
    InvalidWeight { question: usize, weight: f64 },
}

const DEFAULT_WEIGHTS: [f64; 5] = [1.5, 2.0, 1.0, 1.5, 1.0];

/// Static hyperparameters of the classifier: one weight per question,
/// scaling that question's log-likelihood term.
///
/// Weights are checked on construction and on deserialization, so a
/// `ModelConfig` always holds at least one finite, positive weight.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawModelConfig")]
pub struct ModelConfig {
    weights: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawModelConfig {
    weights: Vec<f64>,
}

impl Default for RawModelConfig {
    fn default() -> Self {
        RawModelConfig {
            weights: DEFAULT_WEIGHTS.to_vec(),
        }
    }
}

impl TryFrom<RawModelConfig> for ModelConfig {
    type Error = ConfigError;

    fn try_from(raw: RawModelConfig) -> Result<Self, Self::Error> {
        ModelConfig::new(raw.weights)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            weights: DEFAULT_WEIGHTS.to_vec(),
        }
    }
}

impl ModelConfig {
    pub fn new(weights: Vec<f64>) -> Result<Self, ConfigError> {
        if weights.is_empty() {
            return Err(ConfigError::NoQuestions);
        }
        for (question, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::InvalidWeight { question, weight });
            }
        }
        Ok(ModelConfig { weights })
    }

    /// Every question weighted equally.
    #[cfg(test)]
    pub fn uniform(num_questions: usize) -> Self {
        ModelConfig {
            weights: vec![1.0; num_questions],
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn num_questions(&self) -> usize {
        self.weights.len()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where completed surveys are appended and training rows are read from.
    pub data_path: PathBuf,
    pub model: ModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: PathBuf::from("data.csv"),
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_weights_are_valid() {
        let config = ModelConfig::default();
        assert_eq!(config.num_questions(), 5);
        assert_eq!(ModelConfig::new(config.weights().to_vec()).unwrap(), config);
    }

    #[test]
    fn rejects_bad_weights() {
        assert!(matches!(
            ModelConfig::new(vec![]),
            Err(ConfigError::NoQuestions)
        ));
        assert!(matches!(
            ModelConfig::new(vec![1.0, 0.0]),
            Err(ConfigError::InvalidWeight { question: 1, .. })
        ));
        assert!(matches!(
            ModelConfig::new(vec![1.0, -2.0]),
            Err(ConfigError::InvalidWeight { question: 1, .. })
        ));
        assert!(matches!(
            ModelConfig::new(vec![f64::NAN]),
            Err(ConfigError::InvalidWeight { question: 0, .. })
        ));
    }

    #[test]
    fn loads_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nweights = [1.0, 3.0]").unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.model.weights(), &[1.0, 3.0]);
        assert_eq!(config.data_path, PathBuf::from("data.csv"));
    }

    #[test]
    fn empty_model_table_uses_default_weights() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"x.csv\"\n[model]").unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.model, ModelConfig::default());
        assert_eq!(config.data_path, PathBuf::from("x.csv"));
    }

    #[test]
    fn invalid_weights_in_file_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_path = \"x.csv\"\n[model]\nweights = [-1.0]").unwrap();

        let err = AppConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("finite and positive"));
    }
}
