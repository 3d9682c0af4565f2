// ABOUTME: Model gateway module for the slidegen application
// ABOUTME: Sends prompts to the Anthropic Messages API and reports token usage

use crate::errors::{Result, SlideGenError};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Transport attempts per call before the gateway gives up
const TRANSPORT_ATTEMPTS: u32 = 3;

/// A successful model response: generated text plus token usage counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// The model gateway contract: given a prompt and a temperature in
/// [0.0, 1.0], return generated text with usage counts or a failure.
/// Sentinel strings come back as ordinary text; recognizing them is the
/// caller's job.
pub trait ModelGateway {
    fn call(&self, prompt: &str, temperature: f64) -> Result<GatewayResponse>;
}

/// Configuration for the Anthropic gateway
pub struct GatewayConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

/// Blocking HTTP client for the Anthropic Messages API
pub struct AnthropicGateway {
    client: Client,
    config: GatewayConfig,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

impl AnthropicGateway {
    /// Create a new gateway with the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SlideGenError::GatewayTransportError)?;

        Ok(Self { client, config })
    }

    fn send_request(&self, prompt: &str, temperature: f64) -> Result<GatewayResponse> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .map_err(SlideGenError::GatewayTransportError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SlideGenError::GatewayError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(SlideGenError::GatewayTransportError)?;

        let text = parsed
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(GatewayResponse {
            text: text.trim().to_string(),
            input_tokens: parsed.usage.input_tokens,
            output_tokens: parsed.usage.output_tokens,
        })
    }
}

impl ModelGateway for AnthropicGateway {
    fn call(&self, prompt: &str, temperature: f64) -> Result<GatewayResponse> {
        // Reject out-of-range temperatures before any request goes out
        if !(0.0..=1.0).contains(&temperature) {
            return Err(SlideGenError::ValidationError(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                temperature
            )));
        }

        info!(
            "Calling model {} ({} prompt bytes)",
            self.config.model,
            prompt.len()
        );

        // Try a few times with increasing backoff
        let mut retry_delay = 1000; // Start with 1 second
        let mut last_error = None;

        for attempt in 1..=TRANSPORT_ATTEMPTS {
            match self.send_request(prompt, temperature) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!("Gateway attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                }
            }

            if attempt < TRANSPORT_ATTEMPTS {
                info!("Retrying in {} ms", retry_delay);
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SlideGenError::GatewayError("Unknown error calling model gateway".to_string())
        }))
    }
}
