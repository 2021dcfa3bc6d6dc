//! CLI for placement-report - applies query results to a report workbook
//!
//! Usage:
//!   placement_report_cli update <report.xlsx> --results results.json
//!   placement_report_cli update --layout program --programs BSFin --results results.json
//!   placement_report_cli inspect <report.xlsx>
//!   placement_report_cli cadence --date 10/30/2026

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use placement_report::report::layout::DEFAULT_OUTPUT_TEMPLATE;
use placement_report::report::{
    parse_run_date, resolve_output_path, run_kind, run_report, AggregateScope, QueryResults, ReportConfig,
    WorkbookLayout,
};
use placement_report::ReportWorkbook;

/// Leadership workbook opened when no path is given.
const LEADERSHIP_WORKBOOK: &str = "weekly_placement_report.xlsx";

#[derive(Parser)]
#[command(name = "placement_report_cli")]
#[command(author, version, about = "Weekly placement workbook updater", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Program,
    Leadership,
}

impl From<Layout> for WorkbookLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Program => Self::Program,
            Layout::Leadership => Self::Leadership,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write query results into a report workbook
    Update {
        /// Workbook to update; may contain `{file_label}`
        #[arg(value_name = "FILE", env = "OUTPUT_PATH")]
        workbook: Option<String>,

        /// Query results as JSON
        #[arg(short, long, value_name = "JSON")]
        results: PathBuf,

        /// Report configuration as JSON
        #[arg(short, long, value_name = "JSON")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "leadership")]
        layout: Layout,

        /// Programs of a program workbook, comma separated
        #[arg(short, long, value_delimiter = ',')]
        programs: Vec<String>,

        /// Run date (MM/DD/YYYY or YYYY-MM-DD), today if omitted
        #[arg(short = 'd', long)]
        run_date: Option<String>,

        /// Recompute totals for every history column, not just the new one
        #[arg(long)]
        all_columns: bool,

        /// Write here instead of over the source workbook
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Apply the update but do not save
        #[arg(long)]
        dry_run: bool,
    },

    /// Print sheets, tables and their column metadata as JSON
    Inspect {
        #[arg(value_name = "FILE")]
        workbook: PathBuf,
    },

    /// Print whether a report run is due on a date
    Cadence {
        /// Date to check (MM/DD/YYYY or YYYY-MM-DD), today if omitted
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[allow(clippy::too_many_arguments)]
fn update(
    workbook: Option<String>,
    results: PathBuf,
    config: Option<PathBuf>,
    layout: Layout,
    programs: Vec<String>,
    run_date: Option<String>,
    all_columns: bool,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => ReportConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if let Some(date) = run_date {
        config = config.with_run_date(parse_run_date(&date)?);
    }
    if all_columns {
        config = config.with_aggregate_scope(AggregateScope::AllDataColumns);
    }
    let layout = WorkbookLayout::from(layout);
    if layout == WorkbookLayout::Program && programs.is_empty() {
        bail!("--programs is required for a program workbook");
    }

    let path = workbook_path(workbook, layout, &programs)?;

    let results = QueryResults::load(&results).with_context(|| format!("loading {}", results.display()))?;
    let mut book = ReportWorkbook::open(&path).with_context(|| format!("opening {path}"))?;
    let outcomes =
        run_report(&mut book, layout, &results, &programs, &config).with_context(|| format!("updating {path}"))?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &outcomes)?;
    writeln!(stdout)?;

    if dry_run {
        tracing::info!(path = %path, "dry run, workbook not saved");
        return Ok(());
    }
    match output {
        Some(out) => book.save_as(&out).with_context(|| format!("saving {}", out.display()))?,
        None => book.save().with_context(|| format!("saving {path}"))?,
    }
    eprintln!("Updated: {} ({})", path, config.run_date_label());
    Ok(())
}

/// The workbook to open: the given path or the layout's default, with
/// `{file_label}` filled in from the programs.
fn workbook_path(workbook: Option<String>, layout: WorkbookLayout, programs: &[String]) -> Result<String> {
    let template = workbook.unwrap_or_else(|| match layout {
        WorkbookLayout::Program => DEFAULT_OUTPUT_TEMPLATE.to_string(),
        WorkbookLayout::Leadership => LEADERSHIP_WORKBOOK.to_string(),
    });
    if template.contains("{file_label}") {
        Ok(resolve_output_path(&template, programs)?)
    } else {
        Ok(template)
    }
}

fn inspect(workbook: PathBuf) -> Result<()> {
    let book = ReportWorkbook::open(&workbook).with_context(|| format!("opening {}", workbook.display()))?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, book.workbook())?;
    writeln!(stdout)?;
    Ok(())
}

fn cadence(date: Option<String>) -> Result<()> {
    let date = match date {
        Some(d) => parse_run_date(&d)?,
        None => chrono::Local::now().date_naive(),
    };
    let kind = run_kind(date);
    let report = serde_json::json!({
        "date": date,
        "kind": kind,
        "due": kind.is_due(),
    });
    println!("{report}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Update {
            workbook,
            results,
            config,
            layout,
            programs,
            run_date,
            all_columns,
            output,
            dry_run,
        } => update(workbook, results, config, layout, programs, run_date, all_columns, output, dry_run),
        Commands::Inspect { workbook } => inspect(workbook),
        Commands::Cadence { date } => cadence(date),
    }
}
