// ABOUTME: Outline parsing module for the slidegen application
// ABOUTME: Extracts a course title and ordered topic list from a plain-text outline

use crate::errors::{Result, SlideGenError};
use log::info;
use std::fs;
use std::path::Path;

/// One unit of subject matter, extracted from the outline in source order.
/// Positions are 1-indexed and determine slide numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub position: usize,
    pub text: String,
}

/// A parsed course outline: title plus ordered topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOutline {
    pub title: String,
    pub topics: Vec<Topic>,
}

/// Title used when the outline contains nothing usable
const FALLBACK_TITLE: &str = "Untitled Course";

/// Bullet glyphs recognized at the start of a topic line
const BULLET_GLYPHS: [char; 3] = ['-', '*', '\u{2022}'];

/// Parse an outline file into a course title and topic list.
/// Missing or unreadable files are fatal input errors.
pub fn parse_outline_file(path: &Path) -> Result<CourseOutline> {
    if !path.exists() {
        return Err(SlideGenError::PathNotFoundError(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(SlideGenError::FileReadError)?;
    Ok(parse_outline(&content))
}

/// Parse outline text into a course title and topic list.
/// Never fails: malformed input degrades to a best-effort title and a
/// possibly-empty topic list.
pub fn parse_outline(text: &str) -> CourseOutline {
    let content = text.trim();
    let lines: Vec<&str> = content.lines().collect();

    let title = extract_title(&lines);
    let topics = extract_topics(&lines);

    info!(
        "Parsed outline: title {:?}, {} topics",
        title,
        topics.len()
    );

    CourseOutline { title, topics }
}

/// Extract the course title, trying each recognized format in priority
/// order across the whole text. First match wins.
fn extract_title(lines: &[&str]) -> String {
    // Labeled field: "Course Title: <text>"
    for line in lines {
        if let Some(rest) = line.trim().strip_prefix("Course Title:") {
            if !rest.trim().is_empty() {
                return rest.trim().to_string();
            }
        }
    }

    // Labeled field: "Title: <text>"
    for line in lines {
        if let Some(rest) = line.trim().strip_prefix("Title:") {
            if !rest.trim().is_empty() {
                return rest.trim().to_string();
            }
        }
    }

    // Markdown heading: "# <text>"
    for line in lines {
        if let Some(rest) = line.trim().strip_prefix('#') {
            if !rest.trim().is_empty() {
                return rest.trim().to_string();
            }
        }
    }

    // Underlined heading: "=== <text> ==="
    for line in lines {
        let trimmed = line.trim();
        if trimmed.len() > 1 && trimmed.starts_with('=') && trimmed.ends_with('=') {
            let inner = trimmed.trim_matches('=').trim();
            if !inner.is_empty() {
                return inner.to_string();
            }
        }
    }

    // Fall back to the first non-blank line
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or(FALLBACK_TITLE)
        .to_string()
}

/// Extract topics from the body of the outline, preserving source order.
/// Duplicates are preserved, not deduplicated.
fn extract_topics(lines: &[&str]) -> Vec<Topic> {
    // Skip the header block: everything up to the first blank line.
    // Outlines without a blank line are scanned from the top.
    let content_start = lines
        .iter()
        .position(|line| line.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut topics = Vec::new();
    for line in &lines[content_start..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Skip structural section headings like "Part 1:" or "Chapter 2:"
        if is_section_heading(line) {
            continue;
        }

        if let Some(text) = extract_topic_text(line) {
            topics.push(text);
        }
    }

    topics
        .into_iter()
        .enumerate()
        .map(|(i, text)| Topic {
            position: i + 1,
            text,
        })
        .collect()
}

/// Try each recognized topic format in priority order, falling back to the
/// raw line unless it is a known non-content label.
fn extract_topic_text(line: &str) -> Option<String> {
    let matched = numbered_item(line)
        .or_else(|| bullet_item(line))
        .or_else(|| lettered_item(line))
        .or_else(|| labeled_item(line));

    match matched {
        Some(text) if !text.is_empty() => Some(text),
        // No pattern matched (or it matched with empty content): use the
        // whole line, unless it is a header/label line
        _ => {
            if is_non_content_label(line) {
                None
            } else {
                Some(line.to_string())
            }
        }
    }
}

/// Numbered list item: "1. Topic"
fn numbered_item(line: &str) -> Option<String> {
    let digits: usize = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    Some(rest.trim().to_string())
}

/// Bullet item: "- Topic", "* Topic" or "• Topic"
fn bullet_item(line: &str) -> Option<String> {
    let first = line.chars().next()?;
    if BULLET_GLYPHS.contains(&first) {
        Some(line[first.len_utf8()..].trim().to_string())
    } else {
        None
    }
}

/// Lettered parenthetical item: "(A) Topic"
fn lettered_item(line: &str) -> Option<String> {
    let rest = line.strip_prefix('(')?;
    let letter = rest.chars().next()?;
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let rest = rest[1..].strip_prefix(')')?;
    Some(rest.trim().to_string())
}

/// Labeled item: "Topic: <text>" or "Session: <text>"
fn labeled_item(line: &str) -> Option<String> {
    for label in ["Topic:", "Session:"] {
        if let Some(rest) = line.strip_prefix(label) {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Structural section headings like "Part 3:", "Section 1:", "Module 12:",
/// "Chapter 4:" (case-insensitive) are skipped entirely.
fn is_section_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    for keyword in ["part", "section", "module", "chapter"] {
        if let Some(after) = lower.strip_prefix(keyword) {
            let rest = after.trim_start();
            if rest.len() == after.len() {
                // No whitespace after the keyword ("Partition", "Sections")
                continue;
            }
            let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits > 0 && rest[digits..].starts_with(':') {
                return true;
            }
        }
    }
    false
}

/// Non-content labels like "Overview:", "Summary:", "Notes:", "Objectives:"
/// (case-insensitive) never become topics.
fn is_non_content_label(line: &str) -> bool {
    let lower = line.to_lowercase();
    for label in [
        "overview:",
        "summary:",
        "note:",
        "notes:",
        "objective:",
        "objectives:",
    ] {
        if lower.starts_with(label) {
            return true;
        }
    }
    false
}
