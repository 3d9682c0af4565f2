// ABOUTME: Usage statistics module for the slidegen application
// ABOUTME: Accumulates token counts and derives cost from the fixed price table

use crate::errors::{Result, SlideGenError};
use crate::gateway::GatewayResponse;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

// claude-3-5-sonnet pricing, USD per 1000 tokens
pub const INPUT_PRICE_PER_1K: f64 = 0.003;
pub const OUTPUT_PRICE_PER_1K: f64 = 0.015;

/// Monotonically accumulating token counters for one run.
/// Owned exclusively by the pipeline driver.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Serialize)]
struct StatsRecord {
    input_tokens: u64,
    output_tokens: u64,
    total_tokens: u64,
    total_cost: f64,
    generated_at: String,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the usage reported with one gateway response
    pub fn record(&mut self, response: &GatewayResponse) {
        self.input_tokens += response.input_tokens;
        self.output_tokens += response.output_tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Derived cost in floating-point currency units
    pub fn total_cost(&self) -> f64 {
        (self.input_tokens as f64 / 1000.0) * INPUT_PRICE_PER_1K
            + (self.output_tokens as f64 / 1000.0) * OUTPUT_PRICE_PER_1K
    }

    /// Write the stats record to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let record = StatsRecord {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            total_tokens: self.total_tokens(),
            total_cost: self.total_cost(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        };

        let serialized =
            serde_json::to_string_pretty(&record).map_err(SlideGenError::SerializationError)?;
        fs::write(path, serialized).map_err(SlideGenError::FileReadError)?;

        info!(
            "Saved usage stats to {:?} ({} tokens, ${:.4})",
            path,
            self.total_tokens(),
            self.total_cost()
        );
        Ok(())
    }
}
