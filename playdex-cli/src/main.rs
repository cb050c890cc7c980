mod pages;
mod reports;
mod util;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use pages::PageSource;
use playdex_engine::{IngestReport, PlayStats, SeriesStrategy, StatsConfig, Timeline};
use reports::{PlayReport, StatsSection};
use util::{parse_day, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Apply each day's plays to a running tally (fast)
    Incremental,
    /// Re-aggregate the whole history for every day
    Recompute,
}

impl From<StrategyArg> for SeriesStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Incremental => Self::Incremental,
            StrategyArg::Recompute => Self::Recompute,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportView {
    Stats,
    History,
    Series,
}

const ALL_VIEWS: [ReportView; 3] = [ReportView::Stats, ReportView::History, ReportView::Series];

impl ReportView {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "stats" => Some(Self::Stats),
            "history" => Some(Self::History),
            "series" => Some(Self::Series),
            _ => None,
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::History => "history",
            Self::Series => "series",
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Stats => "Current H index, milestone counts and ranked games",
            Self::History => "Days on which the H index reached a new maximum",
            Self::Series => "Daily total plays, distinct games and H index",
        }
    }

    const fn needs_timeline(self) -> bool {
        matches!(self, Self::History | Self::Series)
    }
}

#[derive(Debug, Parser)]
#[command(name = "playdex", version = "0.1.0")]
#[command(about = "Board-game play statistics: H-index history, daily series and rankings")]
struct Args {
    /// Directory holding numbered play pages (plays_1.json, plays_2.json, ...)
    #[arg(long, default_value = ".")]
    plays_dir: PathBuf,

    /// Explicit play page files, read in the given order (overrides --plays-dir)
    #[arg(long = "plays")]
    plays: Vec<PathBuf>,

    /// Views to produce (comma-separated: stats, history, series or all)
    #[arg(long, default_value = "stats")]
    views: String,

    /// List all available views and exit
    #[arg(long)]
    list_views: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Number of ranked games to list (0 = all); defaults to the ranking milestone count
    #[arg(long)]
    limit: Option<usize>,

    /// Only list games whose name contains this text (case-insensitive)
    #[arg(long)]
    filter: Option<String>,

    /// Last day of the series (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    today: Option<String>,

    /// JSON configuration file (milestones, ranking milestone, series strategy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured series strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_views(&args)? {
        return Ok(());
    }

    let views = expand_views(&args.views)?;
    let config = load_config(&args)?;
    let source = build_source(&args)?;
    let (stats, ingest) =
        PlayStats::from_source(&source, config).context("failed to load play pages")?;

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let today = resolve_today(&args)?;
    let report = build_report(&args, &views, &stats, &ingest, today)?;
    write_report(&args, &report)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🎲 Playdex".bright_cyan().bold());
    println!("{}", "==========".cyan());
}

fn maybe_list_views(args: &Args) -> Result<bool> {
    if !args.list_views {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available views:")?;
    for view in ALL_VIEWS {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            view.key(),
            view.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn expand_views(views_arg: &str) -> Result<Vec<ReportView>> {
    let mut views = Vec::new();
    for name in split_csv(views_arg) {
        let expanded: Vec<ReportView> = if name.eq_ignore_ascii_case("all") {
            ALL_VIEWS.to_vec()
        } else if let Some(view) = ReportView::parse(&name) {
            vec![view]
        } else {
            eprintln!("⚠️  Unknown view: {}", name.yellow());
            continue;
        };
        for view in expanded {
            if !views.contains(&view) {
                views.push(view);
            }
        }
    }
    if views.is_empty() {
        bail!("no valid views requested in {views_arg:?}");
    }
    Ok(views)
}

fn load_config(args: &Args) -> Result<StatsConfig> {
    let mut config = if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        StatsConfig::from_json(&text)
            .with_context(|| format!("invalid configuration in {}", path.display()))?
    } else {
        StatsConfig::default()
    };
    if let Some(strategy) = args.strategy {
        config.series_strategy = strategy.into();
    }
    Ok(config)
}

fn build_source(args: &Args) -> Result<PageSource> {
    if !args.plays.is_empty() {
        return Ok(PageSource::from_files(args.plays.clone()));
    }
    let source = PageSource::discover(&args.plays_dir)
        .with_context(|| format!("failed to scan {}", args.plays_dir.display()))?;
    if source.files().is_empty() {
        log::warn!("no play pages found in {}", args.plays_dir.display());
    }
    Ok(source)
}

fn resolve_today(args: &Args) -> Result<NaiveDate> {
    args.today
        .as_deref()
        .map_or_else(|| Ok(Local::now().date_naive()), parse_day)
}

fn build_report(
    args: &Args,
    views: &[ReportView],
    stats: &PlayStats,
    ingest: &IngestReport,
    today: NaiveDate,
) -> Result<PlayReport> {
    let mut report = PlayReport {
        plays_found: stats.store().len(),
        records_rejected: ingest.rejected.len(),
        ..PlayReport::default()
    };

    if views.contains(&ReportView::Stats) {
        let summary = stats.summary();
        let listing = if let Some(filter) = &args.filter {
            stats.ranked_matching(filter)
        } else if let Some(limit) = args.limit {
            stats.ranked(limit)
        } else {
            summary.top_games.clone()
        };
        report.stats = Some(StatsSection {
            summary,
            filter: args.filter.clone(),
            listing,
        });
    }

    if views.iter().any(|view| view.needs_timeline()) {
        let Timeline { points, records } = stats
            .timeline(today)
            .context("cannot build the play timeline")?;
        if views.contains(&ReportView::History) {
            report.history = Some(records);
        }
        if views.contains(&ReportView::Series) {
            report.series = Some(points);
        }
    }

    Ok(report)
}

fn write_report(args: &Args, report: &PlayReport) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, report)?,
        "csv" => reports::generate_csv_report(&mut output_target, report)?,
        _ => reports::generate_console_report(&mut output_target, report)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
