//! Runtime configuration for the summarization pipeline.

use std::env;

use crate::error::ConfigError;

/// Generation parameters shared by every completion request in a run.
///
/// Validated exhaustively by [`CompletionConfig::validate`] at startup;
/// nothing in the pipeline silently falls back to a default after that.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model identifier sent to the completion API.
    pub model: String,
    /// Upper bound on generated tokens, reserved out of the context window.
    pub max_tokens: usize,
    /// Sampling temperature, 0.0 ..= 2.0.
    pub temperature: f32,
    /// Nucleus sampling cutoff, 0.0 < top_p <= 1.0.
    pub top_p: f32,
    /// Whether to request a streamed response.
    pub stream: bool,
    /// Maximum characters per text chunk and per aggregation batch.
    pub max_chunk_size: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.4,
            top_p: 1.0,
            stream: false,
            max_chunk_size: 4000,
        }
    }
}

impl CompletionConfig {
    /// Check every field range, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(ConfigError::TopPOutOfRange(self.top_p));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        if self.max_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        Ok(())
    }
}

/// Credentials and endpoint for the completion API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

impl ApiConfig {
    /// Read the API key and base URL from the environment.
    ///
    /// `EPITOME_OPENAI_API_KEY` takes precedence over `OPENAI_API_KEY` so the
    /// tool can use a dedicated key next to other OpenAI consumers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("EPITOME_OPENAI_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = env::var("EPITOME_OPENAI_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CompletionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_model() {
        let config = CompletionConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyModel)));
    }

    #[test]
    fn rejects_temperature_out_of_range() {
        let config = CompletionConfig {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TemperatureOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_zero_top_p() {
        let config = CompletionConfig {
            top_p: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TopPOutOfRange(_))
        ));
    }

    #[test]
    fn boundary_values_are_accepted() {
        let config = CompletionConfig {
            temperature: 2.0,
            top_p: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let config = CompletionConfig {
            max_chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChunkSize)));
    }
}
