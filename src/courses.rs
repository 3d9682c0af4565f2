// ABOUTME: Course workspace module for the slidegen application
// ABOUTME: Manages per-course directory layout, metadata and course listing

use crate::errors::{Result, SlideGenError};
use crate::outline;
use crate::utils::ensure_directory_exists;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of one course found under the base directory
#[derive(Debug, Clone)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub path: PathBuf,
    pub slide_count: usize,
}

#[derive(Serialize)]
struct CourseInfo<'a> {
    id: &'a str,
    title: &'a str,
    config_file: String,
    total_topics: usize,
    generated_at: String,
}

/// Manages the directory layout for all courses under one base directory:
/// `<base>/courses/<id>/` with `slides/` and `config/` children.
pub struct CourseManager {
    courses_dir: PathBuf,
}

impl CourseManager {
    /// Create a manager rooted at the given base directory, creating the
    /// courses directory if necessary.
    pub fn new(base_dir: &Path) -> Result<Self> {
        let courses_dir = base_dir.join("courses");
        ensure_directory_exists(&courses_dir)?;
        Ok(Self { courses_dir })
    }

    /// Sanitize a course id to be filesystem friendly: anything outside
    /// alphanumerics, underscore and dash becomes an underscore, and the
    /// result is lowercased.
    pub fn sanitize_id(course_id: &str) -> String {
        course_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect::<String>()
            .to_lowercase()
    }

    /// Path to a course directory (whether or not it exists)
    pub fn course_path(&self, course_id: &str) -> PathBuf {
        self.courses_dir.join(Self::sanitize_id(course_id))
    }

    /// Create the directory structure for a course and return its path
    pub fn create_course_directory(&self, course_id: &str) -> Result<PathBuf> {
        let course_dir = self.course_path(course_id);
        ensure_directory_exists(&course_dir)?;
        ensure_directory_exists(&course_dir.join("slides"))?;
        ensure_directory_exists(&course_dir.join("config"))?;
        Ok(course_dir)
    }

    /// List all courses under the base directory. A directory counts as a
    /// course when it holds a `config/course_config.txt`.
    pub fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        let mut courses = Vec::new();

        for entry in fs::read_dir(&self.courses_dir).map_err(SlideGenError::FileReadError)? {
            let entry = entry.map_err(SlideGenError::FileReadError)?;
            let course_dir = entry.path();
            if !course_dir.is_dir() {
                continue;
            }

            let config_file = course_dir.join("config").join("course_config.txt");
            if !config_file.exists() {
                continue;
            }

            let parsed = outline::parse_outline_file(&config_file)?;
            let slide_count = count_slides(&course_dir.join("slides"));

            courses.push(CourseSummary {
                id: entry.file_name().to_string_lossy().to_string(),
                title: parsed.title,
                path: course_dir,
                slide_count,
            });
        }

        courses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(courses)
    }

    /// Record course metadata next to the outline for later inspection
    pub fn write_course_info(
        &self,
        course_dir: &Path,
        course_id: &str,
        title: &str,
        config_file: &Path,
        total_topics: usize,
    ) -> Result<()> {
        let info = CourseInfo {
            id: course_id,
            title,
            config_file: config_file.to_string_lossy().to_string(),
            total_topics,
            generated_at: chrono::Utc::now().to_rfc3339(),
        };

        let info_path = course_dir.join("config").join("course_info.json");
        let serialized =
            serde_json::to_string_pretty(&info).map_err(SlideGenError::SerializationError)?;
        fs::write(&info_path, serialized).map_err(SlideGenError::FileReadError)?;

        info!("Saved course info to {:?}", info_path);
        Ok(())
    }
}

fn count_slides(slides_dir: &Path) -> usize {
    let pattern = format!("{}/slide_*.html", slides_dir.to_string_lossy());
    glob::glob(&pattern)
        .map(|entries| entries.flatten().count())
        .unwrap_or(0)
}
