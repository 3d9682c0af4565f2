// ABOUTME: Prompt construction module for the slidegen application
// ABOUTME: Builds the slide-generation and summarization prompts sent to the model

/// Literal token the model emits between independent slide chunks when
/// content overflows one slide. Matched verbatim by the driver.
pub const SPLIT_MARKER: &str = "<!--SPLIT_SLIDE_HERE-->";

/// Sentinel emitted by the model when a topic is too ambiguous to proceed.
/// Compared exactly (case-sensitive) after trimming.
pub const TOPIC_CLARIFICATION_SENTINEL: &str = "TOPIC_CLARIFICATION_NEEDED";

/// Sentinel emitted by the model when slide content cannot be summarized.
pub const CONTENT_CLARIFICATION_SENTINEL: &str = "CONTENT_CLARIFICATION_NEEDED";

// Formatting limits enforced through the prompt
pub const MAX_BULLETS_PER_SLIDE: usize = 5;
pub const MAX_WORDS_PER_BULLET: usize = 15;
pub const MAX_NESTING_LEVELS: usize = 2;
pub const MIN_FONT_SIZE_PT: usize = 24;

/// Build the prompt for generating the next slide's content.
/// Embeds the course title, the rendered context of prior-slide summaries,
/// and the topic, together with the fixed formatting constraints.
pub fn generation_prompt(course_title: &str, context: &str, topic: &str) -> String {
    format!(
        r#"You are preparing a series of lecture slides for a course titled "{course_title}".

So far, these are the summaries of previous slides:
{context}

Now please create the next slide. The next slide should cover: "{topic}"

STRICT presentation requirements:
- Maximum {MAX_BULLETS_PER_SLIDE} bullet points per slide
- Maximum {MAX_WORDS_PER_BULLET} words per bullet point
- Maximum {MAX_NESTING_LEVELS} levels of bullet point nesting
- Minimum font size of {MIN_FONT_SIZE_PT}pt (use <style> tags)
- No paragraphs of text - only bullet points
- If content exceeds these limits, split into multiple slides with "{SPLIT_MARKER}"

If you need clarification about the topic, respond with exactly "{TOPIC_CLARIFICATION_SENTINEL}" and nothing else.

Otherwise, please return only valid HTML that fits into the slide content section of the given template. Include a heading and bullet points using HTML elements like <h2>, <ul>, <li>, etc.

Even if you're not completely sure about some aspects of the topic, please provide your best attempt at creating concise slide content based on your current knowledge. Focus on the key concepts you're most confident about.
"#
    )
}

/// Build the prompt asking for a one-to-two-sentence summary of slide
/// content, used to maintain context between slides.
pub fn summary_prompt(slide_content: &str) -> String {
    format!(
        r#"Summarize the following slide content in one or two sentences:

{slide_content}

If you need clarification about the content, respond with exactly "{CONTENT_CLARIFICATION_SENTINEL}" and nothing else.

Even if some aspects seem unclear, please provide your best attempt at a concise summary focusing on the main points you can confidently identify.
"#
    )
}
