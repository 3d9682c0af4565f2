// ABOUTME: Slide combination module for the slidegen application
// ABOUTME: Stitches per-slide HTML files into one scrollable document

use crate::errors::{Result, SlideGenError};
use crate::utils::validate_directory_exists;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub const COMBINED_FILE: &str = "combined_slides.html";

/// Shared stylesheet for the combined document
const COMBINED_CSS: &str = r#"body {
    font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
    margin: 0;
    padding: 0;
    background: #f5f5f5;
}
nav {
    background: #333;
    color: #fff;
    padding: 1rem 2rem;
    position: fixed;
    top: 0;
    left: 0;
    right: 0;
    z-index: 100;
    display: flex;
    flex-wrap: wrap;
    gap: 1rem;
    align-items: center;
}
nav a {
    color: #fff;
    text-decoration: none;
    padding: 0.5rem 1rem;
    border-radius: 4px;
    transition: background-color 0.2s;
}
nav a:hover {
    background-color: rgba(255, 255, 255, 0.1);
}
.slide {
    min-height: calc(100vh - 4rem);
    padding: 3rem 2rem 2rem;
    margin: 0 auto;
    box-sizing: border-box;
    display: flex;
    flex-direction: column;
    background: white;
    margin-bottom: 2px;
    box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    position: relative;
    max-width: 1200px;
}
#slides-container {
    margin-top: 4rem;
    scroll-snap-type: y mandatory;
    overflow-y: auto;
    height: calc(100vh - 4rem);
}
.slide-title {
    position: absolute;
    top: 1rem;
    right: 1rem;
    color: #666;
    font-size: 1.25rem;
}
h1, h2 {
    color: #1a1a1a;
    line-height: 1.2;
    margin-top: 0;
}
h1 { font-size: 2.5rem; }
h2 { font-size: 2rem; }
p, li {
    font-size: 1.5rem;
    line-height: 1.5;
    color: #333;
}
ul {
    padding-left: 2rem;
    margin: 1rem 0;
}
li {
    margin: 0.75rem 0;
    padding-left: 0.5rem;
}
@media (max-width: 768px) {
    nav {
        padding: 0.75rem 1rem;
    }
    .slide {
        padding: 2rem 1rem 1rem;
    }
    h1 { font-size: 2rem; }
    h2 { font-size: 1.75rem; }
    p, li { font-size: 1.25rem; }
}"#;

/// Keyboard navigation and scroll tracking for the combined document
const COMBINED_JS: &str = r#"document.addEventListener('DOMContentLoaded', function() {
    const slides = document.querySelectorAll('.slide');
    let currentSlide = 0;

    function goToSlide(index) {
        if (index >= 0 && index < slides.length) {
            currentSlide = index;
            slides[index].scrollIntoView({ behavior: 'smooth' });
            updateHash(index);
        }
    }

    function updateHash(index) {
        history.replaceState(null, null, `#slide_${index + 1}`);
    }

    // Initialize to hash location or first slide
    const hash = window.location.hash;
    if (hash) {
        const slideNum = parseInt(hash.split('_')[1]) - 1;
        if (!isNaN(slideNum) && slideNum >= 0 && slideNum < slides.length) {
            currentSlide = slideNum;
            slides[currentSlide].scrollIntoView();
        }
    }

    document.addEventListener('keydown', function(e) {
        switch(e.key) {
            case 'ArrowLeft':
            case 'ArrowUp':
                e.preventDefault();
                goToSlide(currentSlide - 1);
                break;
            case 'ArrowRight':
            case 'ArrowDown':
            case ' ':
                e.preventDefault();
                goToSlide(currentSlide + 1);
                break;
            case 'Home':
                e.preventDefault();
                goToSlide(0);
                break;
            case 'End':
                e.preventDefault();
                goToSlide(slides.length - 1);
                break;
        }
    });

    // Update current slide on scroll
    const observer = new IntersectionObserver((entries) => {
        entries.forEach(entry => {
            if (entry.isIntersecting) {
                const newIndex = Array.from(slides).indexOf(entry.target);
                if (newIndex !== currentSlide) {
                    currentSlide = newIndex;
                    updateHash(currentSlide);
                }
            }
        });
    }, {threshold: 0.5});

    slides.forEach(slide => observer.observe(slide));
});"#;

/// Combine all `slide_*.html` files in a directory into one scrollable
/// document, in filename order (which recovers generation order). Slides
/// whose files contain no `<main>` body are skipped.
pub fn combine_slides(slides_dir: &Path, output_path: Option<&Path>) -> Result<PathBuf> {
    validate_directory_exists(slides_dir)?;

    let pattern = format!("{}/slide_*.html", slides_dir.to_string_lossy());
    let mut slide_paths = Vec::new();
    for entry in (glob::glob(&pattern)
        .map_err(|e| SlideGenError::ValidationError(format!("Invalid glob pattern: {}", e)))?)
    .flatten()
    {
        slide_paths.push(entry);
    }

    // Sort to recover generation order from the zero-padded filenames
    slide_paths.sort();

    if slide_paths.is_empty() {
        return Err(SlideGenError::NoSlidesFoundError(pattern));
    }

    info!("Combining {} slides from {:?}", slide_paths.len(), slides_dir);

    let mut nav_links = Vec::new();
    let mut slides_content = String::new();
    let mut index = 0;

    for path in &slide_paths {
        let content = fs::read_to_string(path).map_err(SlideGenError::FileReadError)?;
        let body = match extract_main_content(&content) {
            Some(body) if !body.is_empty() => body,
            // Only add a slide if it has content
            _ => continue,
        };

        index += 1;
        nav_links.push(format!(r##"<a href="#slide_{index}">Slide {index}</a>"##));
        slides_content.push_str(&format!(
            "        <div class=\"slide\" id=\"slide_{index}\">\n            <div class=\"slide-title\">Slide {index}</div>\n            {body}\n        </div>\n\n"
        ));
    }

    let nav_section = nav_links.join(" | ");
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>All Slides</title>
    <style>{COMBINED_CSS}</style>
    <script>{COMBINED_JS}</script>
</head>
<body>
    <nav>
        <strong>Course Slides</strong>
        {nav_section}
    </nav>
    <div id="slides-container">
{slides_content}    </div>
</body>
</html>"#
    );

    let output = output_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| slides_dir.join(COMBINED_FILE));
    fs::write(&output, html).map_err(SlideGenError::FileReadError)?;

    Ok(output)
}

/// Extract the slide body between the `<main>` tags of a slide file
fn extract_main_content(html: &str) -> Option<String> {
    let start = html.find("<main>")? + "<main>".len();
    let end = html[start..].find("</main>")? + start;
    Some(html[start..end].trim().to_string())
}
