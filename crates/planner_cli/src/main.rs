//! Command-line host for the planner core.
//!
//! # Responsibility
//! - Exercise the core end to end: storage, month render, SVG output.
//! - Keep output deterministic for quick local sanity checks.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use planner_core::db::open_db;
use planner_core::{
    default_log_level, init_logging, Assignment, CalendarOptions, Category, MonthView,
    PlannerService, SqliteRecordRepository,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Month view planner for weighted assignments", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite file holding assignments and categories.
    #[arg(long, default_value = "planner.sqlite3", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints core linkage information.
    Ping,
    /// Stores a category.
    AddCategory {
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: String,
    },
    /// Stores an assignment.
    AddAssignment {
        #[arg(long)]
        title: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "1.0")]
        weight: f64,
        #[arg(long)]
        category: String,
    },
    /// Renders one month as SVG on stdout.
    Render {
        #[arg(long)]
        year: i32,
        /// 1 = January.
        #[arg(long)]
        month: u32,
        /// Container width in pixels.
        #[arg(long, default_value = "1500")]
        width: f64,
        /// JSON file with calendar options.
        #[arg(long)]
        options: Option<PathBuf>,
        /// Date to highlight instead of the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        init_logging(default_log_level(), log_dir).map_err(|err| anyhow!(err))?;
    }

    if let Command::Ping = cli.command {
        println!("planner_core ping={}", planner_core::ping());
        println!("planner_core version={}", planner_core::core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let mut service = PlannerService::load(SqliteRecordRepository::new(&conn))?;

    match cli.command {
        Command::Ping => {}
        Command::AddCategory { name, color } => {
            let id = service.add_category(Category::new(name, color))?;
            println!("{id}");
        }
        Command::AddAssignment {
            title,
            start,
            end,
            weight,
            category,
        } => {
            let assignment = Assignment::new(title, start, end, weight, category);
            let (id, days) = (assignment.id, assignment.span_days());
            service.add_assignment(assignment)?;
            println!("{id} days={days}");
        }
        Command::Render {
            year,
            month,
            width,
            options,
            today,
        } => {
            let options = match options {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read `{}`", path.display()))?;
                    CalendarOptions::from_json_str(&raw)?
                }
                None => CalendarOptions::default(),
            };
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let mut view = MonthView::new(options)?;
            let report = service.render_into(&mut view, year, month, width, today)?;
            for skipped in &report.skipped {
                eprintln!("skipped {}: {}", skipped.assignment_id, skipped.error);
            }
            print!("{}", view.scene().to_svg());
        }
    }
    Ok(())
}
