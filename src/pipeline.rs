// ABOUTME: Pipeline driver module for the slidegen application
// ABOUTME: Runs the resumable topic loop: prompt, generate, split, write, summarize

use crate::context::{ContextEntry, ContextStack};
use crate::errors::{Result, SlideGenError};
use crate::gateway::{GatewayResponse, ModelGateway};
use crate::outline::{CourseOutline, Topic};
use crate::prompts::{
    self, CONTENT_CLARIFICATION_SENTINEL, TOPIC_CLARIFICATION_SENTINEL,
};
use crate::slide::{slide_id, split_slide_parts, write_slide};
use crate::stats::UsageStats;
use crate::utils::ensure_directory_exists;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// File names kept alongside the slides in the output directory
pub const SUMMARIES_FILE: &str = "summaries.json";
pub const STATS_FILE: &str = "stats.json";

/// Configuration for one pipeline run
pub struct PipelineConfig {
    pub temperature: f64,
    pub max_retries: usize,
    /// Bounds total topics processed in one run (test mode). Truncates the
    /// loop, not the underlying outline.
    pub topic_limit: Option<usize>,
    /// Rewrite stats.json after every gateway call, not only at run end
    pub stats_every_call: bool,
    /// Cooperative interrupt flag, checked between topic steps only
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_retries: 3,
            topic_limit: None,
            stats_every_call: true,
            interrupt: None,
        }
    }
}

impl PipelineConfig {
    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

/// What happened during one run
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Topic position the run started at (after resume detection)
    pub started_at: usize,
    /// Physical slide files written
    pub slides_written: usize,
    /// Topic positions skipped after exhausting retries or on write errors
    pub skipped_topics: Vec<usize>,
    /// Whether the run stopped on an interrupt
    pub interrupted: bool,
    /// Lowest topic position not yet represented by a slide file; where the
    /// next invocation will resume
    pub resume_point: usize,
    pub stats: UsageStats,
}

/// Outcome of a gateway call driven through the bounded retry policy
#[derive(Debug)]
pub enum CallOutcome {
    Succeeded(GatewayResponse),
    Skipped,
}

/// Drive one gateway call through the bounded retry policy. Transport
/// failures and sentinel responses are both retried against the same
/// budget; exhaustion degrades to `Skipped`, never a crash. Token usage is
/// accumulated for every response received, including sentinel ones.
pub fn run_with_retries(
    gateway: &dyn ModelGateway,
    prompt: &str,
    temperature: f64,
    sentinel: &str,
    max_retries: usize,
    stats: &mut UsageStats,
) -> CallOutcome {
    for attempt in 1..=max_retries {
        match gateway.call(prompt, temperature) {
            Ok(response) => {
                stats.record(&response);
                if response.text.trim() == sentinel {
                    warn!(
                        "Model needs clarification (attempt {}/{})",
                        attempt, max_retries
                    );
                } else {
                    return CallOutcome::Succeeded(response);
                }
            }
            Err(e) => {
                warn!(
                    "Model call failed (attempt {}/{}): {}",
                    attempt, max_retries, e
                );
            }
        }
    }
    CallOutcome::Skipped
}

/// Determine where to resume: scan the output directory for existing slide
/// files and return the highest topic position already materialized plus
/// one. An empty directory resumes at 1.
pub fn next_topic_position(slides_dir: &Path) -> Result<usize> {
    let pattern = format!("{}/slide_*.html", slides_dir.to_string_lossy());
    let mut highest = 0;

    for entry in (glob::glob(&pattern)
        .map_err(|e| SlideGenError::ValidationError(format!("Invalid glob pattern: {}", e)))?)
    .flatten()
    {
        if let Some(position) = parse_slide_position(&entry) {
            highest = highest.max(position);
        }
    }

    Ok(highest + 1)
}

/// Parse the topic position out of a slide filename like
/// "slide_012.html" or "slide_012_2.html"
fn parse_slide_position(path: &Path) -> Option<usize> {
    let stem = path.file_stem()?.to_str()?;
    let id = stem.strip_prefix("slide_")?;
    let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Run the slide-generation pipeline over every pending topic.
/// Resumes from existing output, processes topics strictly in ascending
/// order, and persists progress (slides, summaries, stats) as it goes.
pub fn run_pipeline(
    gateway: &dyn ModelGateway,
    outline: &CourseOutline,
    slides_dir: &Path,
    config: &PipelineConfig,
) -> Result<PipelineReport> {
    // Failure to create the output directory aborts the run entirely
    ensure_directory_exists(slides_dir)?;

    let resume_at = next_topic_position(slides_dir)?;
    let stack_path = slides_dir.join(SUMMARIES_FILE);
    let stats_path = slides_dir.join(STATS_FILE);

    let mut stack = ContextStack::load(&stack_path)?;
    let mut report = PipelineReport {
        started_at: resume_at,
        resume_point: resume_at,
        ..Default::default()
    };

    if resume_at > 1 {
        info!(
            "Resuming at topic {} with {} context entries",
            resume_at,
            stack.len()
        );
    }

    let mut processed = 0;
    for topic in outline.topics.iter().filter(|t| t.position >= resume_at) {
        if config.is_interrupted() {
            report.interrupted = true;
            break;
        }
        if let Some(limit) = config.topic_limit {
            if processed >= limit {
                info!("Topic limit of {} reached, stopping", limit);
                break;
            }
        }
        processed += 1;

        println!(
            "Generating slide {} for topic: {}",
            topic.position, topic.text
        );

        match generate_topic(
            gateway,
            &outline.title,
            topic,
            slides_dir,
            &stats_path,
            &mut stack,
            &mut report.stats,
            config,
        ) {
            Ok(0) => report.skipped_topics.push(topic.position),
            Ok(written) => report.slides_written += written,
            Err(e) => {
                // A write failure abandons this topic's step, not the run
                error!("Failed to generate topic {}: {}", topic.position, e);
                report.skipped_topics.push(topic.position);
            }
        }
    }

    // Where the next invocation's resume detection will land
    report.resume_point = next_topic_position(slides_dir)?;

    if let Err(e) = report.stats.save(&stats_path) {
        error!("Failed to save usage stats: {}", e);
    }

    Ok(report)
}

/// Per-topic step: build the prompt from the current context, call the
/// gateway, split the response, write each part as a slide, and summarize
/// each part back onto the context stack. Returns the number of slide
/// files written (zero when the topic was skipped).
#[allow(clippy::too_many_arguments)]
fn generate_topic(
    gateway: &dyn ModelGateway,
    course_title: &str,
    topic: &Topic,
    slides_dir: &Path,
    stats_path: &Path,
    stack: &mut ContextStack,
    stats: &mut UsageStats,
    config: &PipelineConfig,
) -> Result<usize> {
    let context = stack.render();
    let prompt = prompts::generation_prompt(course_title, &context, &topic.text);

    let outcome = run_with_retries(
        gateway,
        &prompt,
        config.temperature,
        TOPIC_CLARIFICATION_SENTINEL,
        config.max_retries,
        stats,
    );
    save_stats_checkpoint(stats, stats_path, config);

    let response = match outcome {
        CallOutcome::Succeeded(response) => response,
        CallOutcome::Skipped => {
            warn!(
                "Skipping topic {} after {} attempts: {}",
                topic.position, config.max_retries, topic.text
            );
            return Ok(0);
        }
    };

    let parts = split_slide_parts(&response.text);
    let multi_part = parts.len() > 1;
    let mut written = 0;

    for (j, part) in parts.iter().enumerate() {
        let id = slide_id(topic.position, multi_part.then_some(j + 1));
        write_slide(slides_dir, &id, course_title, &topic.text, part)?;
        written += 1;

        let summary_prompt = prompts::summary_prompt(part);
        let outcome = run_with_retries(
            gateway,
            &summary_prompt,
            config.temperature,
            CONTENT_CLARIFICATION_SENTINEL,
            config.max_retries,
            stats,
        );
        save_stats_checkpoint(stats, stats_path, config);

        match outcome {
            CallOutcome::Succeeded(summary) => {
                stack.append(ContextEntry {
                    index: id,
                    summary: summary.text.trim().to_string(),
                })?;
            }
            CallOutcome::Skipped => {
                // The context stack simply omits this part
                warn!("Proceeding without a summary for slide {}", id);
            }
        }
    }

    Ok(written)
}

fn save_stats_checkpoint(stats: &UsageStats, stats_path: &Path, config: &PipelineConfig) {
    if config.stats_every_call {
        if let Err(e) = stats.save(stats_path) {
            warn!("Failed to checkpoint usage stats: {}", e);
        }
    }
}
