mod loader;
mod reports;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use loader::FsLoader;
use xwing_meta::{DataCounts, MalformedReportPolicy, MetaEngine, RunConfig, RunOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnMalformed {
    /// Stop at the first report that cannot be parsed
    Abort,
    /// Log unparsable reports and carry on
    Skip,
}

impl From<OnMalformed> for MalformedReportPolicy {
    fn from(value: OnMalformed) -> Self {
        match value {
            OnMalformed::Abort => Self::Abort,
            OnMalformed::Skip => Self::Skip,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "xwing-meta", version)]
#[command(about = "Compile X-Wing pilot usage and list statistics from tournament reports")]
struct Args {
    /// Ship catalog JSON file
    #[arg(long, default_value = "ships.json")]
    ships: PathBuf,

    /// Pilot catalog JSON file
    #[arg(long, default_value = "pilots.json")]
    pilots: PathBuf,

    /// Directory of downloaded tournament reports (*.json)
    #[arg(long, default_value = "tournaments")]
    tournaments: PathBuf,

    /// Directory the CSV reports are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Optional JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference date for the recent window (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Length of the recent window in months
    #[arg(long)]
    recent_months: Option<u32>,

    /// What to do with reports that cannot be parsed
    #[arg(long, value_enum)]
    on_malformed_report: Option<OnMalformed>,

    /// Summary format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Optional path to write the summary instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let loader = FsLoader::new(
        args.ships.clone(),
        args.pilots.clone(),
        args.tournaments.clone(),
    );
    let engine = MetaEngine::new(loader, config);
    let output = engine.run().context("metagame run failed")?;

    write_csv_reports(&args.out_dir, &output)?;
    write_summary(&args, &output, start_time)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn announce_banner() {
    println!("{}", "🛰  X-Wing Metagame Compiler".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            RunConfig::from_json(&json)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => RunConfig::default(),
    };
    if let Some(as_of) = args.as_of {
        config.as_of = Some(as_of);
    }
    if let Some(months) = args.recent_months {
        config.recent_window_months = months;
    }
    if let Some(policy) = args.on_malformed_report {
        config.on_malformed_report = policy.into();
    }
    config.validate().context("invalid run configuration")?;
    Ok(config)
}

fn create_csv(dir: &Path, name: &str) -> Result<BufWriter<File>> {
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_csv_reports(dir: &Path, output: &RunOutput) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let catalog = &output.catalog;

    let mut ships = create_csv(dir, "ships.csv")?;
    reports::write_ships(&mut ships, catalog).context("failed to write ships.csv")?;
    ships.flush()?;

    let mut duplicates = create_csv(dir, "pilot-duplicates.csv")?;
    reports::write_pilot_duplicates(&mut duplicates, catalog)
        .context("failed to write pilot-duplicates.csv")?;
    duplicates.flush()?;

    let mut pilots = create_csv(dir, "pilots.csv")?;
    reports::write_pilots(&mut pilots, catalog, &output.totals.usage)
        .context("failed to write pilots.csv")?;
    pilots.flush()?;

    let stats = output.list_stats().context("failed to summarize lists")?;
    let mut lists = create_csv(dir, "lists.csv")?;
    reports::write_lists(&mut lists, &stats).context("failed to write lists.csv")?;
    lists.flush()?;

    log::info!("reports written to {}", dir.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    ships: usize,
    pilots: usize,
    all_time: DataCounts,
    recent: DataCounts,
    skipped: &'a [xwing_meta::SkippedReport],
}

impl<'a> Summary<'a> {
    fn new(output: &'a RunOutput) -> Self {
        Self {
            ships: output.catalog.ships().len(),
            pilots: output.catalog.pilots().len(),
            all_time: output.totals.all_time,
            recent: output.totals.recent,
            skipped: &output.totals.skipped,
        }
    }
}

fn write_summary(args: &Args, output: &RunOutput, start_time: Instant) -> Result<()> {
    let summary = Summary::new(output);
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.report == "json" {
        serde_json::to_writer_pretty(&mut output_target, &summary)?;
        writeln!(&mut output_target)?;
    } else {
        write_console_summary(&mut output_target, &summary)?;
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_console_summary(out: &mut dyn Write, summary: &Summary<'_>) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Counts".bright_cyan().bold())?;
    writeln!(
        out,
        "Catalog: {} ships, {} pilots",
        summary.ships, summary.pilots
    )?;
    for (label, counts) in [("All time", summary.all_time), ("Recent", summary.recent)] {
        writeln!(
            out,
            "{label:>8}: {} tournaments, {} lists, {} pilot instances",
            counts.tournaments.to_string().green(),
            counts.list_instances.to_string().green(),
            counts.pilot_instances.to_string().green()
        )?;
    }
    if !summary.skipped.is_empty() {
        writeln!(out, "{}", "Skipped reports:".yellow())?;
        for skipped in summary.skipped {
            writeln!(out, "  • {}: {}", skipped.report, skipped.reason.red())?;
        }
    }
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
