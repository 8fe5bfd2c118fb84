//! lectern-player - command-line course player
//!
//! Wires the lectern crates together:
//! - Catalog loading
//! - Progress store
//! - Content context (content side) and SCORM bridge (host side) joined by
//!   the message bus
//! - Course player with gating and auto-advance

mod script;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lectern_api::{EventKind, LessonKind};
use lectern_config::{Catalog, Course, load_config};
use lectern_core::{CoursePlayer, PlayerEvent, ScormBridge};
use lectern_ipc::MessageBus;
use lectern_scorm::{ContentContext, LaunchOptions};
use lectern_store::{SqliteStore, Store};
use lectern_util::{
    CourseId, LecternError, LessonId, MonotonicInstant, PROGRESS_DB_FILENAME, default_config_path,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::script::{load_script, run_script};

/// Host loop tick: message pump and auto-advance check
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// lectern-player - Course player with SCORM content support
#[derive(Parser, Debug)]
#[command(name = "lectern-player")]
#[command(about = "Course player with SCORM 1.2 content support", long_about = None)]
struct Args {
    /// Catalog file path (default: ~/.config/lectern/catalog.toml)
    #[arg(short, long, env = "LECTERN_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set LECTERN_DATA_DIR env var)
    #[arg(short, long, env = "LECTERN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List courses and lesson progress
    Courses,

    /// Play a SCORM lesson from a script of API calls
    Play {
        #[arg(long)]
        course: String,

        /// Lesson to open (default: first lesson)
        #[arg(long)]
        lesson: Option<String>,

        /// JSON script of legacy API calls
        #[arg(long)]
        script: PathBuf,
    },

    /// Mark a video lesson as watched to the end
    Complete {
        #[arg(long)]
        course: String,

        #[arg(long)]
        lesson: String,
    },

    /// Forget all progress for a course
    Reset {
        #[arg(long)]
        course: String,
    },
}

struct App {
    catalog: Catalog,
    store: Arc<dyn Store>,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let catalog = load_config(&args.config)
            .with_context(|| format!("Failed to load catalog from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            course_count = catalog.courses.len(),
            "Catalog loaded"
        );

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| catalog.player.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(PROGRESS_DB_FILENAME);
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        Ok(Self { catalog, store })
    }

    fn course(&self, id: &str) -> Result<&Course> {
        let id = CourseId::new(id);
        let course = self
            .catalog
            .get_course(&id)
            .ok_or(LecternError::CourseNotFound(id))?;
        Ok(course)
    }

    fn player(&self, course_id: &str) -> Result<CoursePlayer> {
        let course = self.course(course_id)?.clone();
        Ok(CoursePlayer::new(
            course,
            self.store.clone(),
            self.catalog.player.auto_advance_delay,
        ))
    }

    fn list_courses(&self) {
        for course in &self.catalog.courses {
            let player = CoursePlayer::new(
                course.clone(),
                self.store.clone(),
                self.catalog.player.auto_advance_delay,
            );
            println!("{} ({})", course.title, course.id);
            if !course.description.is_empty() {
                println!("  {}", course.description);
            }
            println!(
                "  {}/{} lessons, {}% ({})",
                player.completed_count(),
                course.lessons.len(),
                player.progress_percent(),
                player.status()
            );
            for view in player.lesson_views() {
                let marker = if view.complete {
                    "[x]"
                } else if view.selectable {
                    "[ ]"
                } else {
                    "[-]"
                };
                println!(
                    "  {} {}. {} ({}, {})",
                    marker,
                    view.index + 1,
                    view.title,
                    view.lesson_id,
                    view.kind
                );
            }
        }
    }

    async fn play(&self, course_id: &str, lesson_id: Option<&str>, script: &Path) -> Result<()> {
        let steps = load_script(script)?;
        let mut player = self.player(course_id)?;

        if let Some(lesson_id) = lesson_id {
            player.select_lesson(&LessonId::new(lesson_id))?;
        }

        let lesson = player
            .active_lesson()
            .cloned()
            .ok_or(LecternError::NoActiveLesson)?;
        if lesson.kind != LessonKind::Scorm {
            bail!(
                "Lesson {} is a video lesson; use `complete` to mark it watched",
                lesson.id
            );
        }

        // Listener goes up before the content can emit anything
        let bus = MessageBus::new();
        let mut bridge = ScormBridge::attach(&bus);

        let options = LaunchOptions::from_player(&self.catalog.player);
        let mut context = ContentContext::launch(&lesson, bus.port(), &options)?;

        for outcome in run_script(&context, &steps) {
            let args = outcome.step.args.join(", ");
            match outcome.result {
                Some(result) => println!("{}({}) -> {:?}", outcome.step.call, args, result),
                None => {
                    let global = outcome.step.global.unwrap_or_default();
                    warn!(global = %global, "Script used an unpublished global");
                    println!("{}({}) -> no API under {:?}", outcome.step.call, args, global);
                }
            }
        }
        context.teardown();

        let mut tick_timer = tokio::time::interval(TICK_INTERVAL);
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping playback");
                    break;
                }

                _ = tick_timer.tick() => {
                    let now_mono = MonotonicInstant::now();

                    while let Some(message) = bridge.poll()? {
                        print_events(player.handle_classified(message, now_mono));
                    }
                    print_events(player.tick(now_mono));

                    if let Some(remaining) = player.time_until_advance(now_mono) {
                        debug!(remaining_ms = remaining.as_millis() as u64, "Waiting to advance");
                    } else {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn complete(&self, course_id: &str, lesson_id: &str) -> Result<()> {
        let mut player = self.player(course_id)?;
        let lesson_id = LessonId::new(lesson_id);
        player.select_lesson(&lesson_id)?;

        if player.active_lesson().map(|l| l.kind) != Some(LessonKind::Video) {
            warn!(lesson_id = %lesson_id, "Completing a non-video lesson by hand");
        }

        print_events(player.on_media_ended(MonotonicInstant::now()));
        Ok(())
    }

    fn reset(&self, course_id: &str) -> Result<()> {
        let mut player = self.player(course_id)?;
        print_events(vec![player.reset_progress()]);
        Ok(())
    }
}

fn print_events(events: Vec<PlayerEvent>) {
    for event in events {
        match event {
            PlayerEvent::Progress { kind, payload } => {
                let payload = serde_json::to_string(&payload)
                    .unwrap_or_else(|e| format!("<unprintable: {}>", e));
                match kind {
                    EventKind::Other(_) => println!("progress ({}, unrecognized): {}", kind, payload),
                    _ => println!("progress ({}): {}", kind, payload),
                }
            }
            PlayerEvent::LessonCompleted {
                lesson_id,
                newly_recorded,
            } => {
                if newly_recorded {
                    println!("lesson {} complete", lesson_id);
                } else {
                    println!("lesson {} complete (already recorded)", lesson_id);
                }
            }
            PlayerEvent::AdvanceScheduled { from, to, delay } => {
                println!("advancing from {} to {} in {}ms", from, to, delay.as_millis());
            }
            PlayerEvent::LessonChanged {
                previous,
                lesson_id,
            } => match previous {
                Some(previous) => println!("active lesson: {} (was {})", lesson_id, previous),
                None => println!("active lesson: {}", lesson_id),
            },
            PlayerEvent::ProgressCleared { course_id } => {
                println!("progress cleared for {}", course_id);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "lectern-player starting");

    let app = App::new(&args)?;

    match &args.command {
        Command::Courses => app.list_courses(),
        Command::Play {
            course,
            lesson,
            script,
        } => app.play(course, lesson.as_deref(), script).await?,
        Command::Complete { course, lesson } => app.complete(course, lesson)?,
        Command::Reset { course } => app.reset(course)?,
    }

    Ok(())
}
