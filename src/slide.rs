// ABOUTME: Slide writing module for the slidegen application
// ABOUTME: Renders generated content into the HTML slide template with stable identifiers

use crate::errors::{Result, SlideGenError};
use crate::prompts::SPLIT_MARKER;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed presentation template. Placeholders are substituted literally;
/// the stylesheet enforces font-size and layout limits independent of
/// whatever the model produced. The `li li li` rule clamps bullet nesting
/// to two levels.
const SLIDE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
	<meta charset="UTF-8">
	<meta name="viewport" content="width=device-width, initial-scale=1.0">
	<title>{{SLIDE_TITLE}} - {{COURSE_TITLE}}</title>
	<style>
		:root {
			--main-font: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
		}
		body {
			font-family: var(--main-font);
			margin: 0;
			padding: 0;
			min-height: 100vh;
			display: flex;
			flex-direction: column;
		}
		main {
			flex: 1;
			padding: 2rem;
			max-width: 1200px;
			margin: 0 auto;
			width: 100%;
			box-sizing: border-box;
		}
		h1, h2 {
			color: #1a1a1a;
			line-height: 1.2;
		}
		h1 {
			font-size: 2.5rem;
			margin-bottom: 1.5rem;
		}
		h2 {
			font-size: 2rem;
			margin: 1rem 0;
		}
		p, li {
			font-size: 1.5rem;
			line-height: 1.5;
			color: #333;
		}
		ul {
			padding-left: 1rem;
			margin: 1rem 0;
			max-width: 1000px;
		}
		li {
			margin: 0.75rem 0;
			padding-left: 0.25rem;
		}
		/* Prevent deep nesting */
		li li li {
			display: none;
		}
		.header {
			background: #333;
			color: white;
			padding: 1rem 2rem;
			font-size: 1.25rem;
		}
		.footer {
			background: #f5f5f5;
			padding: 1rem 2rem;
			font-size: 1rem;
			border-top: 1px solid #ddd;
		}
		.slide-number {
			position: absolute;
			top: 1rem;
			right: 1rem;
			font-size: 1.25rem;
			color: #666;
		}
	</style>
</head>
<body>
	<div class="header">{{COURSE_TITLE}}</div>
	<main>
		{{SLIDE_CONTENT}}
	</main>
	<div class="footer">{{FOOTER_NOTES}}</div>
</body>
</html>"#;

/// Build the stable slide identifier for a topic position: a zero-padded
/// 3-digit number, with an underscore-part suffix when the topic's content
/// was split into multiple physical slides (e.g. "012_2").
pub fn slide_id(position: usize, part: Option<usize>) -> String {
    match part {
        Some(p) => format!("{:03}_{}", position, p),
        None => format!("{:03}", position),
    }
}

/// Split a model response on the literal split marker into one or more
/// parts, in order. A response containing the marker m times yields
/// exactly m+1 parts, each trimmed of surrounding whitespace.
pub fn split_slide_parts(text: &str) -> Vec<String> {
    text.split(SPLIT_MARKER)
        .map(|part| part.trim().to_string())
        .collect()
}

/// Fill the slide template with the given content.
/// Placeholder substitution is literal, not a template engine.
pub fn fill_template(
    course_title: &str,
    slide_title: &str,
    slide_content: &str,
    footer_notes: &str,
) -> String {
    SLIDE_TEMPLATE
        .replace("{{COURSE_TITLE}}", course_title)
        .replace("{{SLIDE_TITLE}}", slide_title)
        .replace("{{SLIDE_CONTENT}}", slide_content)
        .replace("{{FOOTER_NOTES}}", footer_notes)
}

/// Render a slide through the template and write it to
/// `<slides_dir>/slide_<id>.html`. Re-writing the same identifier with
/// identical inputs produces byte-identical output.
pub fn write_slide(
    slides_dir: &Path,
    id: &str,
    course_title: &str,
    slide_title: &str,
    body: &str,
) -> Result<PathBuf> {
    let filled = fill_template(course_title, slide_title, body, "");
    let slide_path = slides_dir.join(format!("slide_{}.html", id));

    info!("Writing slide to {:?}", slide_path);
    fs::write(&slide_path, filled).map_err(SlideGenError::FileReadError)?;

    Ok(slide_path)
}
