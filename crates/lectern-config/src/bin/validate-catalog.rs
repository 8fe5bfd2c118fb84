//! Catalog validation CLI tool
//!
//! Validates a lectern catalog file and reports any errors.

use lectern_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-catalog [catalog-file]");
            eprintln!();
            eprintln!("Validates a lectern course catalog.");
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-catalog {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Catalog file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match lectern_config::load_config(&config_path) {
        Ok(catalog) => {
            println!("✓ Catalog is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", lectern_config::CURRENT_CONFIG_VERSION);
            println!("  Courses: {}", catalog.courses.len());
            println!(
                "  Auto-advance delay: {} ms",
                catalog.player.auto_advance_delay.as_millis()
            );

            for course in &catalog.courses {
                println!();
                println!("{} ({})", course.title, course.id);
                for (index, lesson) in course.lessons.iter().enumerate() {
                    println!(
                        "  {}. {} [{}]: {}",
                        index + 1,
                        lesson.id,
                        lesson.kind,
                        lesson.src
                    );
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Catalog validation failed");
            eprintln!();
            match &e {
                lectern_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                lectern_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                lectern_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                lectern_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        lectern_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
