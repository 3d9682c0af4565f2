use slidegen::combine_slides;
use slidegen::slide::write_slide;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_combine_orders_slides_by_filename() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    // Write out of order; the combined document must follow the ids
    write_slide(dir.path(), "003", "Course", "Third", "<h2>Third</h2>")
        .expect("write failed");
    write_slide(dir.path(), "001", "Course", "First", "<h2>First</h2>")
        .expect("write failed");
    write_slide(dir.path(), "002", "Course", "Second", "<h2>Second</h2>")
        .expect("write failed");

    let output = combine_slides(dir.path(), None).expect("combine failed");
    assert_eq!(output, dir.path().join("combined_slides.html"));

    let html = fs::read_to_string(&output).expect("read failed");
    let first = html.find("<h2>First</h2>").expect("missing first");
    let second = html.find("<h2>Second</h2>").expect("missing second");
    let third = html.find("<h2>Third</h2>").expect("missing third");
    assert!(first < second && second < third);

    // Navigation links for all three slides
    assert!(html.contains(r##"<a href="#slide_1">Slide 1</a>"##));
    assert!(html.contains(r##"<a href="#slide_3">Slide 3</a>"##));
}

#[test]
fn test_combine_includes_split_parts_in_order() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    write_slide(dir.path(), "001_1", "Course", "Topic", "<h2>Part one</h2>")
        .expect("write failed");
    write_slide(dir.path(), "001_2", "Course", "Topic", "<h2>Part two</h2>")
        .expect("write failed");
    write_slide(dir.path(), "002", "Course", "Next", "<h2>Next topic</h2>")
        .expect("write failed");

    let output = combine_slides(dir.path(), None).expect("combine failed");
    let html = fs::read_to_string(&output).expect("read failed");

    let part_one = html.find("<h2>Part one</h2>").expect("missing part one");
    let part_two = html.find("<h2>Part two</h2>").expect("missing part two");
    let next = html.find("<h2>Next topic</h2>").expect("missing next");
    assert!(part_one < part_two && part_two < next);
}

#[test]
fn test_combine_skips_body_less_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    write_slide(dir.path(), "001", "Course", "Real", "<h2>Real</h2>").expect("write failed");
    fs::write(
        dir.path().join("slide_002.html"),
        "<html><body>no main element</body></html>",
    )
    .expect("write failed");

    let output = combine_slides(dir.path(), None).expect("combine failed");
    let html = fs::read_to_string(&output).expect("read failed");

    assert!(html.contains("<h2>Real</h2>"));
    assert!(!html.contains("no main element"));
    assert!(!html.contains(r##"<a href="#slide_2">"##));
}

#[test]
fn test_combine_fails_with_no_slides() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = combine_slides(dir.path(), None);
    assert!(result.is_err());
}

#[test]
fn test_combine_honors_explicit_output_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_slide(dir.path(), "001", "Course", "Only", "<h2>Only</h2>").expect("write failed");

    let target = dir.path().join("deck.html");
    let output = combine_slides(dir.path(), Some(&target)).expect("combine failed");
    assert_eq!(output, target);
    assert!(target.exists());
}
