// ABOUTME: Main entry point for the slidegen program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate HTML slides from a course outline
    Generate(GenerateArgs),

    /// Combine generated slides into one scrollable document
    Combine(CombineArgs),

    /// List all available courses
    ListCourses(ListCoursesArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Unique identifier for the course
    #[arg(long)]
    course_id: String,

    /// Path to the course outline file (copied into the course directory
    /// on first use)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory for all courses
    #[arg(long, default_value = "./slidegen_courses")]
    base_dir: PathBuf,

    /// Generate only the first few topics, for quick iteration
    #[arg(long)]
    test_mode: bool,

    /// Sampling temperature in [0.0, 1.0]
    #[arg(short, long)]
    temperature: Option<f64>,
}

#[derive(Args)]
struct CombineArgs {
    /// Directory containing the generated slide files
    #[arg(short, long)]
    slides_dir: PathBuf,

    /// Path for the combined document (defaults to
    /// combined_slides.html inside the slides directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ListCoursesArgs {
    /// Base directory for all courses
    #[arg(long, default_value = "./slidegen_courses")]
    base_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Combine(args)) => {
            println!("Combining slides from {:?}...", args.slides_dir);
            slidegen::combine_slides(&args.slides_dir, args.output.as_deref())
                .map(|output| println!("Combined slides written to {:?}", output))
        }
        Some(Commands::ListCourses(args)) => run_list_courses(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_generate(args: &GenerateArgs) -> slidegen::Result<()> {
    if let Some(t) = args.temperature {
        if !(0.0..=1.0).contains(&t) {
            return Err(slidegen::SlideGenError::ValidationError(format!(
                "Temperature must be between 0.0 and 1.0, got {}",
                t
            )));
        }
    }

    let config = slidegen::Config::from_env();

    // Set up the course directory structure
    let manager = slidegen::CourseManager::new(&args.base_dir)?;
    let course_dir = manager.create_course_directory(&args.course_id)?;
    let config_file = course_dir.join("config").join("course_config.txt");

    // Copy a provided outline into the course directory on first use
    if let Some(config_src) = &args.config {
        slidegen::utils::validate_file_exists(config_src)?;
        if !config_file.exists() {
            fs::copy(config_src, &config_file)
                .map_err(|e| anyhow::anyhow!("Failed to copy outline file: {}", e))?;
        }
    }

    if !config_file.exists() {
        return Err(slidegen::SlideGenError::ConfigError(format!(
            "Course outline not found: {:?}. Pass one with --config.",
            config_file
        )));
    }

    // Parse the outline and record course metadata
    let outline = slidegen::parse_outline_file(&config_file)?;
    manager.write_course_info(
        &course_dir,
        &args.course_id,
        &outline.title,
        &config_file,
        outline.topics.len(),
    )?;

    let slides_dir = course_dir.join("slides");
    slidegen::utils::validate_directory_writable(&slides_dir)?;

    // Install the cooperative interrupt flag. A first Ctrl-C stops the run
    // between topics; a second one force-exits.
    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupt);
        ctrlc::set_handler(move || {
            if flag.load(Ordering::SeqCst) {
                eprintln!("\nForce exit requested.");
                std::process::exit(130);
            }
            eprintln!("\nInterrupt received - finishing the current topic, progress is saved...");
            flag.store(true, Ordering::SeqCst);
        })
        .map_err(|e| {
            slidegen::SlideGenError::ConfigError(format!("Failed to set interrupt handler: {}", e))
        })?;
    }

    let gateway = slidegen::AnthropicGateway::new(config.get_gateway_config()?)?;
    let pipeline_config =
        config.get_pipeline_config(args.temperature, args.test_mode, Some(interrupt));

    println!(
        "Generating slides for \"{}\" ({} topics)...",
        outline.title,
        outline.topics.len()
    );

    let report = slidegen::run_pipeline(&gateway, &outline, &slides_dir, &pipeline_config)?;

    println!();
    if report.interrupted {
        println!("Generation interrupted. Progress has been saved.");
        println!(
            "Resume from topic {} by re-running the same command.",
            report.resume_point
        );
    } else {
        println!("Slide generation complete!");
    }
    println!("Slides written: {}", report.slides_written);
    if !report.skipped_topics.is_empty() {
        println!(
            "Skipped topics (will be retried on the next run if still pending): {:?}",
            report.skipped_topics
        );
    }
    println!(
        "Token usage: {} in / {} out, estimated cost ${:.4}",
        report.stats.input_tokens,
        report.stats.output_tokens,
        report.stats.total_cost()
    );
    let output_dir = slidegen::utils::get_absolute_path(&slides_dir)?;
    println!("Generated slides are in: {:?}", output_dir);

    Ok(())
}

fn run_list_courses(args: &ListCoursesArgs) -> slidegen::Result<()> {
    let manager = slidegen::CourseManager::new(&args.base_dir)?;
    let courses = manager.list_courses()?;

    if courses.is_empty() {
        println!("\nNo courses found. Create a new course with --course-id and --config options.");
        return Ok(());
    }

    println!("\nAvailable Courses:");
    println!("{}", "-".repeat(80));
    println!("{:<20} {:<40} {:<10}", "ID", "Title", "Slides");
    println!("{}", "-".repeat(80));
    for course in &courses {
        let title: String = course.title.chars().take(38).collect();
        println!(
            "{:<20} {:<40} {:<10}",
            course.id, title, course.slide_count
        );
    }
    println!("\nTo generate slides for a course, use:");
    println!("slidegen generate --course-id <course_id>");

    Ok(())
}
