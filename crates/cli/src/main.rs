use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use coursesync_core::config::Config;
use coursesync_core::reconcile::{apply, Confirmed};
use coursesync_core::sessions::sort_sessions_by_date;
use coursesync_core::{export, logging, node_count, Course};

#[derive(Parser, Debug)]
#[command(name = "coursesync", about = "Replays confirmed course changes onto a course snapshot")]
struct Args {
    /// Course snapshot as returned by the course service (JSON)
    course: PathBuf,
    /// JSON array of confirmed changes to apply, in arrival order
    #[arg(short, long)]
    ops: Option<PathBuf>,
    /// Config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the configured UTC offset, in minutes
    #[arg(long)]
    utc_offset: Option<i32>,
    /// Write the resulting course summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Write the resulting file-group tree as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the resulting sessions as CSV
    #[arg(long)]
    sessions_csv: Option<PathBuf>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(offset) = args.utc_offset {
        config.utc_offset_minutes = offset;
    }
    logging::init(&config.log_filter);
    let tz = config.offset()?;

    let mut course: Course = read_json(&args.course)?;
    sort_sessions_by_date(&mut course.sessions);
    tracing::info!(course = %course.id, title = %course.title, "snapshot loaded");

    let ops: Vec<Confirmed> = match &args.ops {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let total = ops.len();
    let mut changed = 0usize;
    for op in ops {
        if apply(&mut course, op).is_changed() {
            changed += 1;
        }
    }

    if let Some(path) = &args.json {
        let json = export::to_json(&course)?;
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::file_groups_to_csv(&course.course_details.files, file)?;
    }
    if let Some(path) = &args.sessions_csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::sessions_to_csv(&course.sessions, &tz, file)?;
    }

    println!(
        "Applied {} / {} changes: {} sessions, {} forum entries, {} file groups",
        changed,
        total,
        course.sessions.len(),
        course.course_details.forum.entries.len(),
        node_count(&course.course_details.files),
    );
    Ok(())
}
