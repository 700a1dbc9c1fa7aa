//! Stand-in for the external generator: mutates the workspace files the
//! deck observes. Useful for demos and for exercising the watcher path.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use fs2::FileExt;
use pulse_core::{
    load_state, save_state, ArtifactRecord, WorkspaceState, DATA_DIR, PLAN_FILE, STATE_FILE,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "pulse-sim", about = "Simulate the lesson-plan generator")]
struct Cli {
    /// Workspace root (defaults to the current directory).
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record an uploaded syllabus artifact.
    AddSyllabus {
        name: String,
        #[arg(long, default_value_t = 18.0)]
        size_kb: f64,
    },
    /// Record an uploaded test artifact.
    AddTest {
        name: String,
        #[arg(long, default_value_t = 9.0)]
        size_kb: f64,
    },
    /// Increment the generated-plans counter.
    BumpPlans {
        #[arg(default_value_t = 1)]
        count: u64,
    },
    /// Write (or append) plan text into the overview file the deck watches.
    WritePlan {
        text: String,
        #[arg(long)]
        append: bool,
    },
    /// Run a short scripted upload-and-generate sequence.
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("resolve current directory")?,
    };

    match cli.command {
        Command::AddSyllabus { name, size_kb } => {
            add_artifact(&root, Artifact::Syllabus, &name, size_kb)?;
        }
        Command::AddTest { name, size_kb } => {
            add_artifact(&root, Artifact::Test, &name, size_kb)?;
        }
        Command::BumpPlans { count } => {
            let state = locked_update(&root, |state| state.plans_generated += count)?;
            info!(plans = state.plans_generated, "plans counter bumped");
        }
        Command::WritePlan { text, append } => {
            write_plan(&root, &text, append)?;
            info!("plan overview written");
        }
        Command::Demo => run_demo(&root)?,
    }

    Ok(())
}

enum Artifact {
    Syllabus,
    Test,
}

fn add_artifact(root: &Path, kind: Artifact, name: &str, size_kb: f64) -> Result<()> {
    let record = ArtifactRecord::named(name, size_kb, Utc::now());
    let state = locked_update(root, |state| match kind {
        Artifact::Syllabus => state.syllabi.push(record.clone()),
        Artifact::Test => state.tests.push(record.clone()),
    })?;
    info!(
        syllabi = state.syllabi.len(),
        tests = state.tests.len(),
        "artifact recorded: {name}"
    );
    Ok(())
}

/// Read-modify-write of the state file under an exclusive lock so the deck
/// never observes a torn write.
fn locked_update(
    root: &Path,
    mutate: impl FnOnce(&mut WorkspaceState),
) -> Result<WorkspaceState> {
    let dir = root.join(DATA_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create data directory {}", dir.display()))?;

    let lock_path = dir.join(".state.lock");
    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("open lock file {}", lock_path.display()))?;
    lock.lock_exclusive().context("acquire state lock")?;

    let state_path = dir.join(STATE_FILE);
    let mut state = if state_path.exists() {
        load_state(&state_path).with_context(|| format!("load {}", state_path.display()))?
    } else {
        WorkspaceState::default()
    };
    mutate(&mut state);
    save_state(&state_path, &state).with_context(|| format!("save {}", state_path.display()))?;

    lock.unlock().context("release state lock")?;
    Ok(state)
}

fn write_plan(root: &Path, text: &str, append: bool) -> Result<()> {
    let dir = root.join(DATA_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create data directory {}", dir.display()))?;
    let plan_path = dir.join(PLAN_FILE);

    if append {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&plan_path)
            .with_context(|| format!("open {}", plan_path.display()))?;
        writeln!(file, "{text}").with_context(|| format!("append {}", plan_path.display()))?;
    } else {
        std::fs::write(&plan_path, text)
            .with_context(|| format!("write {}", plan_path.display()))?;
    }
    Ok(())
}

fn run_demo(root: &Path) -> Result<()> {
    info!("demo: uploading syllabus");
    add_artifact(root, Artifact::Syllabus, "algebra-term2.pdf", 18.4)?;
    thread::sleep(Duration::from_secs(2));

    info!("demo: uploading test paper");
    add_artifact(root, Artifact::Test, "unit-1-quiz.pdf", 9.2)?;
    thread::sleep(Duration::from_secs(2));

    info!("demo: generating plan");
    locked_update(root, |state| state.plans_generated += 1)?;
    write_plan(
        root,
        "Week 1: Algebra warm-ups and Fractions review.\n\
         Week 2: Algebra drills, Decimals practice, Homework set 3.\n\
         Week 3: Review session and group Project kickoff.",
        false,
    )?;
    info!("demo: done");
    Ok(())
}
