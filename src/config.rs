// ABOUTME: Configuration module for the slidegen application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{Result, SlideGenError};
use crate::gateway::GatewayConfig;
use crate::pipeline::PipelineConfig;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Number of topics processed per run when test mode is enabled
pub const TEST_MODE_TOPIC_LIMIT: usize = 5;

/// Global configuration for the application
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub default_timeout_ms: u64,
    pub max_retries: usize,
    pub default_temperature: f64,
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: env::var("ANTHROPIC_API_KEY").ok(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
            default_timeout_ms: 60000, // 60 seconds
            max_retries: 3,
            default_temperature: 0.7,
            base_dir: PathBuf::from("./slidegen_courses"),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY").ok();
        let model = env::var("SLIDEGEN_MODEL")
            .unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string());
        let max_tokens = env::var("SLIDEGEN_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(1024);
        let default_timeout_ms = env::var("DEFAULT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60000);
        let max_retries = env::var("SLIDEGEN_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(3);
        let default_temperature = env::var("SLIDEGEN_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.7);
        let base_dir = env::var("SLIDEGEN_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./slidegen_courses"));

        Self {
            api_key,
            model,
            max_tokens,
            default_timeout_ms,
            max_retries,
            default_temperature,
            base_dir,
        }
    }

    /// Get a gateway configuration with defaults from this config.
    /// Fails when no API key is available, since the gateway cannot
    /// authenticate without one.
    pub fn get_gateway_config(&self) -> Result<GatewayConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            SlideGenError::ConfigError(
                "ANTHROPIC_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(GatewayConfig {
            api_key,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout_ms: self.default_timeout_ms,
        })
    }

    /// Get a pipeline configuration with defaults from this config
    pub fn get_pipeline_config(
        &self,
        temperature: Option<f64>,
        test_mode: bool,
        interrupt: Option<Arc<AtomicBool>>,
    ) -> PipelineConfig {
        PipelineConfig {
            temperature: temperature.unwrap_or(self.default_temperature),
            max_retries: self.max_retries,
            topic_limit: if test_mode {
                Some(TEST_MODE_TOPIC_LIMIT)
            } else {
                None
            },
            stats_every_call: true,
            interrupt,
        }
    }
}
