use anyhow::{Context, Result};
use clap::ValueEnum;
use std::env;
use std::path::PathBuf;

use crate::app::Theme;
use crate::llm::ProviderKind;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_OLLAMA_HOST: &str = "http://localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";
const LOG_FILE_NAME: &str = "chatpane.log";

/// Values given on the command line; these win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub theme: Option<Theme>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub gemini: GeminiConfig,
    pub ollama: OllamaConfig,
    pub theme: Theme,
    pub log_file: PathBuf,
}

impl Config {
    /// Resolve from the process environment (after `.env` has been loaded)
    pub fn from_env(overrides: &Overrides) -> Result<Self> {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    /// Resolve from `overrides` first, then `lookup`, then built-in defaults.
    /// Empty environment values count as unset.
    pub fn resolve<F>(overrides: &Overrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match overrides.provider {
            Some(provider) => provider,
            None => var("CHATPANE_PROVIDER")
                .map(|name| ProviderKind::parse(&name))
                .transpose()
                .context("Invalid CHATPANE_PROVIDER")?
                .unwrap_or_default(),
        };

        let theme = match overrides.theme {
            Some(theme) => theme,
            None => var("CHATPANE_THEME")
                .map(|name| {
                    <Theme as ValueEnum>::from_str(name.trim(), true)
                        .map_err(|_| anyhow::anyhow!("Unknown theme {:?}, expected light or dark", name))
                })
                .transpose()?
                .unwrap_or_default(),
        };

        let port = match var("OLLAMA_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("OLLAMA_PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_OLLAMA_PORT,
        };

        let mut gemini = GeminiConfig {
            api_key: var("GEMINI_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        };

        let mut ollama = OllamaConfig {
            host: var("OLLAMA_HOST").unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string()),
            port,
            model: var("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        };

        // --model applies to whichever service is selected
        if let Some(model) = &overrides.model {
            match provider {
                ProviderKind::Gemini => gemini.model = model.clone(),
                ProviderKind::Ollama => ollama.model = model.clone(),
            }
        }

        let log_file = overrides
            .log_file
            .clone()
            .unwrap_or_else(|| env::temp_dir().join(LOG_FILE_NAME));

        Ok(Self {
            provider,
            gemini,
            ollama,
            theme,
            log_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = Config::resolve(&Overrides::default(), |_| None)?;
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.theme, Theme::Light);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.ollama.host, DEFAULT_OLLAMA_HOST);
        assert_eq!(config.ollama.port, DEFAULT_OLLAMA_PORT);
        assert_eq!(config.ollama.model, DEFAULT_OLLAMA_MODEL);
        assert!(config.log_file.ends_with(LOG_FILE_NAME));
        Ok(())
    }

    #[test]
    fn test_environment_values() -> Result<()> {
        let config = Config::resolve(
            &Overrides::default(),
            lookup_from(&[
                ("CHATPANE_PROVIDER", "Ollama"),
                ("CHATPANE_THEME", "dark"),
                ("GEMINI_API_KEY", "abc"),
                ("OLLAMA_HOST", "http://gpu-box"),
                ("OLLAMA_PORT", "8080"),
            ]),
        )?;
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.gemini.api_key.as_deref(), Some("abc"));
        assert_eq!(config.ollama.host, "http://gpu-box");
        assert_eq!(config.ollama.port, 8080);
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_environment() -> Result<()> {
        let overrides = Overrides {
            provider: Some(ProviderKind::Gemini),
            model: Some("gemini-2.0-flash".to_string()),
            theme: Some(Theme::Light),
            log_file: Some(PathBuf::from("/tmp/custom.log")),
        };
        let config = Config::resolve(
            &overrides,
            lookup_from(&[
                ("CHATPANE_PROVIDER", "ollama"),
                ("CHATPANE_THEME", "dark"),
                ("GEMINI_MODEL", "gemini-1.0-pro"),
            ]),
        )?;
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.ollama.model, DEFAULT_OLLAMA_MODEL);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.log_file, PathBuf::from("/tmp/custom.log"));
        Ok(())
    }

    #[test]
    fn test_blank_values_count_as_unset() -> Result<()> {
        let config = Config::resolve(
            &Overrides::default(),
            lookup_from(&[("GEMINI_API_KEY", "  "), ("OLLAMA_PORT", "")]),
        )?;
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.ollama.port, DEFAULT_OLLAMA_PORT);
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let bad_port = Config::resolve(&Overrides::default(), lookup_from(&[("OLLAMA_PORT", "eleven")]));
        assert!(bad_port.is_err());

        let bad_provider =
            Config::resolve(&Overrides::default(), lookup_from(&[("CHATPANE_PROVIDER", "claude")]));
        assert!(bad_provider.is_err());

        let bad_theme = Config::resolve(&Overrides::default(), lookup_from(&[("CHATPANE_THEME", "sepia")]));
        assert!(bad_theme.is_err());
    }
}
