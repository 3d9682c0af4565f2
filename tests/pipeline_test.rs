use slidegen::pipeline::{PipelineConfig, run_pipeline};
use slidegen::prompts::{
    CONTENT_CLARIFICATION_SENTINEL, TOPIC_CLARIFICATION_SENTINEL,
};
use slidegen::{CourseOutline, GatewayResponse, ModelGateway, SlideGenError, Topic};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

/// Replays a scripted sequence of gateway responses and records the
/// prompts it was called with
struct ScriptedGateway {
    responses: RefCell<VecDeque<slidegen::Result<GatewayResponse>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGateway {
    fn new(responses: Vec<slidegen::Result<GatewayResponse>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl ModelGateway for ScriptedGateway {
    fn call(&self, prompt: &str, _temperature: f64) -> slidegen::Result<GatewayResponse> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(SlideGenError::GatewayError("script exhausted".to_string())))
    }
}

fn response(text: &str) -> slidegen::Result<GatewayResponse> {
    Ok(GatewayResponse {
        text: text.to_string(),
        input_tokens: 100,
        output_tokens: 50,
    })
}

fn outline(topics: &[&str]) -> CourseOutline {
    CourseOutline {
        title: "Test Course".to_string(),
        topics: topics
            .iter()
            .enumerate()
            .map(|(i, text)| Topic {
                position: i + 1,
                text: text.to_string(),
            })
            .collect(),
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        temperature: 0.7,
        max_retries: 3,
        topic_limit: None,
        stats_every_call: false,
        interrupt: None,
    }
}

#[test]
fn test_pipeline_generates_slides_and_context() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![
        response("<h2>History</h2><ul><li>Point</li></ul>"),
        response("Covers the history."),
        response("<h2>Basics</h2><ul><li>Point</li></ul>"),
        response("Covers the basics."),
    ]);

    let report = run_pipeline(
        &gateway,
        &outline(&["History", "Basics"]),
        dir.path(),
        &test_config(),
    )
    .expect("pipeline failed");

    assert_eq!(report.slides_written, 2);
    assert_eq!(report.started_at, 1);
    assert_eq!(report.resume_point, 3);
    assert!(report.skipped_topics.is_empty());
    assert!(!report.interrupted);

    let slide_1 = fs::read_to_string(dir.path().join("slide_001.html")).expect("missing slide");
    assert!(slide_1.contains("<h2>History</h2>"));
    assert!(slide_1.contains("Test Course"));
    assert!(dir.path().join("slide_002.html").exists());

    // Both summaries were appended in generation order
    let summaries = fs::read_to_string(dir.path().join("summaries.json")).expect("missing stack");
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&summaries).expect("invalid stack JSON");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["index"], "001");
    assert_eq!(entries[1]["index"], "002");

    // Stats were persisted at run end: 4 calls at 100 in / 50 out each
    let stats = fs::read_to_string(dir.path().join("stats.json")).expect("missing stats");
    let stats: serde_json::Value = serde_json::from_str(&stats).expect("invalid stats JSON");
    assert_eq!(stats["input_tokens"], 400);
    assert_eq!(stats["output_tokens"], 200);
    assert_eq!(stats["total_tokens"], 600);

    // The second generation prompt saw the first summary
    let prompts = gateway.prompts();
    assert!(prompts[2].contains("Covers the history."));
}

#[test]
fn test_pipeline_resumes_after_existing_slides() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    // Slides 1..3 already materialized, with a 3-entry context stack
    for i in 1..=3 {
        fs::write(
            dir.path().join(format!("slide_{:03}.html", i)),
            "<html><main>old</main></html>",
        )
        .expect("write failed");
    }
    let existing = serde_json::json!([
        {"index": "001", "summary": "One"},
        {"index": "002", "summary": "Two"},
        {"index": "003", "summary": "Three"},
    ]);
    fs::write(
        dir.path().join("summaries.json"),
        serde_json::to_string_pretty(&existing).unwrap(),
    )
    .expect("write failed");

    let gateway = ScriptedGateway::new(vec![
        response("<h2>Fourth</h2>"),
        response("Fourth summary."),
    ]);

    let report = run_pipeline(
        &gateway,
        &outline(&["One", "Two", "Three", "Four"]),
        dir.path(),
        &test_config(),
    )
    .expect("pipeline failed");

    // Started exactly at topic 4, never regenerated 1..3
    assert_eq!(report.started_at, 4);
    assert_eq!(report.slides_written, 1);
    assert_eq!(gateway.call_count(), 2);
    assert!(dir.path().join("slide_004.html").exists());

    // The generation prompt carried all three prior summaries, in order
    let prompts = gateway.prompts();
    let one = prompts[0].find("Slide 001: One").expect("missing summary");
    let two = prompts[0].find("Slide 002: Two").expect("missing summary");
    let three = prompts[0].find("Slide 003: Three").expect("missing summary");
    assert!(one < two && two < three);

    let summaries = fs::read_to_string(dir.path().join("summaries.json")).expect("missing stack");
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&summaries).expect("invalid stack JSON");
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[3]["index"], "004");
}

#[test]
fn test_pipeline_skips_topic_on_sentinel_exhaustion() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![
        // Topic 1: the final retry still returns the ambiguity sentinel
        response(TOPIC_CLARIFICATION_SENTINEL),
        response(TOPIC_CLARIFICATION_SENTINEL),
        response(TOPIC_CLARIFICATION_SENTINEL),
        // Topic 2 proceeds normally
        response("<h2>Second</h2>"),
        response("Second summary."),
    ]);

    let report = run_pipeline(
        &gateway,
        &outline(&["Ambiguous", "Clear"]),
        dir.path(),
        &test_config(),
    )
    .expect("pipeline failed");

    // Zero slide files for the ambiguous topic, run continued
    assert!(!dir.path().join("slide_001.html").exists());
    assert!(dir.path().join("slide_002.html").exists());
    assert_eq!(report.slides_written, 1);
    assert_eq!(report.skipped_topics, vec![1]);
}

#[test]
fn test_pipeline_splits_multi_part_response() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![
        response("<h2>A</h2><!--SPLIT_SLIDE_HERE--><h2>B</h2>"),
        response("Summary of A."),
        response("Summary of B."),
    ]);

    let report = run_pipeline(&gateway, &outline(&["Split me"]), dir.path(), &test_config())
        .expect("pipeline failed");

    assert_eq!(report.slides_written, 2);

    let part_1 =
        fs::read_to_string(dir.path().join("slide_001_1.html")).expect("missing part 1");
    let part_2 =
        fs::read_to_string(dir.path().join("slide_001_2.html")).expect("missing part 2");
    assert!(part_1.contains("<h2>A</h2>"));
    assert!(!part_1.contains("SPLIT_SLIDE_HERE"));
    assert!(part_2.contains("<h2>B</h2>"));

    let summaries = fs::read_to_string(dir.path().join("summaries.json")).expect("missing stack");
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&summaries).expect("invalid stack JSON");
    assert_eq!(entries[0]["index"], "001_1");
    assert_eq!(entries[1]["index"], "001_2");
}

#[test]
fn test_pipeline_topic_limit_truncates_run() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![
        response("<h2>One</h2>"),
        response("Summary one."),
        response("<h2>Two</h2>"),
        response("Summary two."),
    ]);

    let config = PipelineConfig {
        topic_limit: Some(2),
        ..test_config()
    };
    let report = run_pipeline(
        &gateway,
        &outline(&["A", "B", "C", "D", "E"]),
        dir.path(),
        &config,
    )
    .expect("pipeline failed");

    assert_eq!(report.slides_written, 2);
    assert_eq!(report.resume_point, 3);
    assert!(!dir.path().join("slide_003.html").exists());
}

#[test]
fn test_pipeline_continues_without_summary() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![
        response("<h2>One</h2>"),
        // Summarization declines on every retry
        response(CONTENT_CLARIFICATION_SENTINEL),
        response(CONTENT_CLARIFICATION_SENTINEL),
        response(CONTENT_CLARIFICATION_SENTINEL),
        response("<h2>Two</h2>"),
        response("Summary two."),
    ]);

    let report = run_pipeline(&gateway, &outline(&["A", "B"]), dir.path(), &test_config())
        .expect("pipeline failed");

    // The slide is still written; the context stack simply omits it
    assert_eq!(report.slides_written, 2);
    assert!(dir.path().join("slide_001.html").exists());

    let summaries = fs::read_to_string(dir.path().join("summaries.json")).expect("missing stack");
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&summaries).expect("invalid stack JSON");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["index"], "002");
}

#[test]
fn test_pipeline_stops_on_interrupt_flag() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = ScriptedGateway::new(vec![]);

    let flag = Arc::new(AtomicBool::new(true));
    let config = PipelineConfig {
        interrupt: Some(flag),
        ..test_config()
    };

    let report = run_pipeline(&gateway, &outline(&["A", "B"]), dir.path(), &config)
        .expect("pipeline failed");

    assert!(report.interrupted);
    assert_eq!(report.slides_written, 0);
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(report.resume_point, 1);
}

#[test]
fn test_pipeline_two_stage_resume_scenario() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let topics = ["A", "B", "C", "D", "E"];

    // First run stops after three topics (as if interrupted)
    let first = ScriptedGateway::new(vec![
        response("<h2>A</h2>"),
        response("Summary A."),
        response("<h2>B</h2>"),
        response("Summary B."),
        response("<h2>C</h2>"),
        response("Summary C."),
    ]);
    let config = PipelineConfig {
        topic_limit: Some(3),
        ..test_config()
    };
    let report = run_pipeline(&first, &outline(&topics), dir.path(), &config)
        .expect("first run failed");
    assert_eq!(report.slides_written, 3);

    // A fresh run resumes at topic 4 with a 3-entry context stack
    let second = ScriptedGateway::new(vec![
        response("<h2>D</h2>"),
        response("Summary D."),
        response("<h2>E</h2>"),
        response("Summary E."),
    ]);
    let report = run_pipeline(&second, &outline(&topics), dir.path(), &test_config())
        .expect("second run failed");

    assert_eq!(report.started_at, 4);
    assert_eq!(report.slides_written, 2);

    let first_prompt = &second.prompts()[0];
    assert!(first_prompt.contains("Summary A."));
    assert!(first_prompt.contains("Summary B."));
    assert!(first_prompt.contains("Summary C."));
    assert!(!first_prompt.contains("Summary D."));
}
