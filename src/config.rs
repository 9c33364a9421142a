use std::path::PathBuf;

use crate::pipeline::analysis::{
    AnalysisError, ClauseAnalyzer, CompletionService, GeminiClient, OllamaClient,
    GEMINI_DEFAULT_MODEL, GEMINI_DEFAULT_URL, OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_URL,
};

/// Application-level constants
pub const APP_NAME: &str = "clause-lens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP timeout for one completion call. Local models on CPU are slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_BACKEND: &str = "CLAUSE_LENS_BACKEND";
pub const ENV_BASE_URL: &str = "CLAUSE_LENS_BASE_URL";
pub const ENV_MODEL: &str = "CLAUSE_LENS_MODEL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CLAUSE_LENS_TIMEOUT_SECS";
pub const ENV_DUMP_DIR: &str = "CLAUSE_LENS_DUMP_DIR";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "warn,clause_lens=info"
}

/// Which completion service answers the classification prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    #[default]
    Ollama,
    Gemini,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AnalysisError> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(AnalysisError::Config(format!(
                "unknown backend '{other}' (expected ollama or gemini)"
            ))),
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Ollama => OLLAMA_DEFAULT_URL,
            Self::Gemini => GEMINI_DEFAULT_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => OLLAMA_DEFAULT_MODEL,
            Self::Gemini => GEMINI_DEFAULT_MODEL,
        }
    }
}

/// Runtime configuration for building a `ClauseAnalyzer`.
///
/// `base_url` and `model` hold explicit overrides only; the accessors fall
/// back to the backend's defaults so that switching backend also switches
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub backend: Backend,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub dump_dir: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            base_url: None,
            model: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dump_dir: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AnalysisError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get(ENV_BACKEND) {
            Some(value) => Backend::parse(&value)?,
            None => Backend::default(),
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AnalysisError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number, got '{value}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            backend,
            base_url: get(ENV_BASE_URL),
            model: get(ENV_MODEL),
            api_key: get(ENV_GEMINI_API_KEY),
            timeout_secs,
            dump_dir: get(ENV_DUMP_DIR).map(PathBuf::from),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn build_service(&self) -> Result<Box<dyn CompletionService + Send + Sync>, AnalysisError> {
        match self.backend {
            Backend::Ollama => Ok(Box::new(OllamaClient::new(
                self.base_url(),
                self.model(),
                self.timeout_secs,
            )?)),
            Backend::Gemini => {
                let api_key = self.api_key.as_deref().ok_or_else(|| {
                    AnalysisError::Config(format!("{ENV_GEMINI_API_KEY} is required for the gemini backend"))
                })?;
                Ok(Box::new(GeminiClient::new(
                    self.base_url(),
                    self.model(),
                    api_key,
                    self.timeout_secs,
                )?))
            }
        }
    }

    pub fn build_analyzer(&self) -> Result<ClauseAnalyzer, AnalysisError> {
        let service = self.build_service()?;
        tracing::debug!(
            backend = self.backend.as_str(),
            base_url = %self.base_url(),
            model = %self.model(),
            timeout_secs = self.timeout_secs,
            "Completion service configured"
        );
        Ok(ClauseAnalyzer::new(service).with_dump_dir(self.dump_dir.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_local_ollama() {
        let config = AnalyzerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.base_url(), "http://localhost:11434");
        assert_eq!(config.model(), "llama3.1");
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.dump_dir, None);
    }

    #[test]
    fn environment_values_are_read() {
        let config = AnalyzerConfig::from_lookup(lookup(&[
            (ENV_BACKEND, "Gemini"),
            (ENV_MODEL, "gemini-1.5-pro"),
            (ENV_GEMINI_API_KEY, "k"),
            (ENV_TIMEOUT_SECS, " 60 "),
            (ENV_DUMP_DIR, "/tmp/clause-lens"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Gemini);
        assert_eq!(config.base_url(), GEMINI_DEFAULT_URL);
        assert_eq!(config.model(), "gemini-1.5-pro");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.dump_dir, Some(PathBuf::from("/tmp/clause-lens")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            AnalyzerConfig::from_lookup(lookup(&[(ENV_BACKEND, " "), (ENV_MODEL, "")])).unwrap();
        assert_eq!(config.backend, Backend::Ollama);
        assert_eq!(config.model(), OLLAMA_DEFAULT_MODEL);
    }

    #[test]
    fn unknown_backend_is_config_error() {
        let err = AnalyzerConfig::from_lookup(lookup(&[(ENV_BACKEND, "openai")])).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(ref m) if m.contains("openai")));
    }

    #[test]
    fn bad_timeout_is_config_error() {
        let err = AnalyzerConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn gemini_without_key_cannot_build() {
        let config = AnalyzerConfig {
            backend: Backend::Gemini,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(config.build_service(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn switching_backend_switches_defaults() {
        let mut config = AnalyzerConfig::default();
        config.backend = Backend::Gemini;
        assert_eq!(config.model(), GEMINI_DEFAULT_MODEL);
        config.model = Some("custom".into());
        assert_eq!(config.model(), "custom");
    }

    #[test]
    fn builds_ollama_analyzer() {
        let analyzer = AnalyzerConfig::default().build_analyzer().unwrap();
        assert_eq!(analyzer.backend(), "ollama");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
