//! CLI entry point for the dataset profiler.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_profiler::{
    Backend, BatchSummary, OutcomeStatus, Profiler, ProfilerConfig, ProfilerConfigBuilder,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

/// CLI-compatible backend enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBackend {
    /// Polars DataFrame read from CSV
    Frame,
    /// In-memory rows of field maps
    Records,
}

impl From<CliBackend> for Backend {
    fn from(cli: CliBackend) -> Self {
        match cli {
            CliBackend::Frame => Backend::Frame,
            CliBackend::Records => Backend::Records,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Batch statistical profiler for CSV datasets",
    long_about = "Profiles each input CSV file and writes one text report per file.\n\n\
                  EXAMPLES:\n  \
                  # Profile three files into ./output\n  \
                  lex-profiler ads.csv posts.csv tweets.csv\n\n  \
                  # Custom output directory and configuration file\n  \
                  lex-profiler data/*.csv -o reports/ --config profiler.json\n\n  \
                  # Preview classification and key-sets without writing reports\n  \
                  lex-profiler ads.csv --dry-run\n\n  \
                  # Machine-readable batch summary\n  \
                  lex-profiler ads.csv --json | jq .outcomes"
)]
struct Args {
    /// CSV files to profile (replace the config file's sources when given)
    inputs: Vec<PathBuf>,

    /// Output directory for reports
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of leading rows sampled for type inference
    #[arg(long)]
    sample_size: Option<usize>,

    /// Minimum share of parseable sampled values for a numeric column (0.0 - 1.0)
    #[arg(long)]
    min_numeric_ratio: Option<f64>,

    /// Value treated as missing in categorical columns (repeatable)
    ///
    /// Replaces the default set (NA, N/A, NULL) when given.
    #[arg(long = "null-token")]
    null_tokens: Vec<String>,

    /// Dataset backend
    #[arg(long, value_enum)]
    backend: Option<CliBackend>,

    /// Profile datasets one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Show what would be profiled without writing reports
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    if config.sources.is_empty() {
        return Err(anyhow!("No input files given (pass CSV paths or a config with sources)"));
    }
    debug!("Configuration: {:?}", config);

    let mut builder = Profiler::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{}] {}: {}",
                update.stage.display_name(),
                update.source,
                update.message
            );
        });
    }
    let profiler = builder.build()?;

    if args.dry_run {
        return run_dry_run(&profiler, &args);
    }

    let summary = profiler.run();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_human_readable_summary(&summary);
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} datasets failed",
            summary.failed_count(),
            summary.outcomes.len()
        ))
    }
}

/// Merge the config file (if any) with command line overrides.
fn build_config(args: &Args) -> Result<ProfilerConfig> {
    let mut base = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            ProfilerConfig::from_json_file(path)?
        }
        None => ProfilerConfig::default(),
    };
    if !args.inputs.is_empty() {
        base.sources = args.inputs.clone();
    }

    let mut builder = ProfilerConfigBuilder::from_config(base);
    if let Some(ref output) = args.output {
        builder = builder.output_dir(output);
    }
    if let Some(rows) = args.sample_size {
        builder = builder.sample_size(rows);
    }
    if let Some(ratio) = args.min_numeric_ratio {
        builder = builder.min_numeric_ratio(ratio);
    }
    if !args.null_tokens.is_empty() {
        builder = builder.null_tokens(args.null_tokens.iter().cloned());
    }
    if let Some(backend) = args.backend {
        builder = builder.backend(backend.into());
    }
    if args.sequential {
        builder = builder.parallel(false);
    }

    Ok(builder.build()?)
}

/// Run dry-run mode - show what would happen without writing reports
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_dry_run(profiler: &Profiler, args: &Args) -> Result<()> {
    let plans = profiler.plan_all();

    if args.json {
        let entries: Vec<_> = plans
            .iter()
            .map(|(source, plan)| match plan {
                Ok(plan) => json!({ "source": source, "plan": plan }),
                Err(e) => json!({ "source": source, "error": e }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of profiling");
    println!("{}\n", "=".repeat(80));

    for (source, plan) in &plans {
        println!("DATASET: {}", source.display());
        println!("{}", "-".repeat(40));

        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                println!("  Cannot be profiled: {}", e);
                println!();
                continue;
            }
        };

        println!("  Rows: {}", plan.row_count);
        println!("  Report: {}", plan.report_path.display());
        println!();

        println!("  {:<30} {:<12}", "Column", "Kind");
        println!("  {}", "-".repeat(42));
        for (column, kind) in &plan.classification.columns {
            println!("  {:<30} {:<12}", truncate_str(column, 29), kind);
        }
        println!();

        if plan.group_keys.is_empty() {
            println!("  No grouping rule matches; report will contain only OVERALL");
        } else {
            println!("  Key-sets:");
            for key in &plan.group_keys {
                println!("    - {}", key);
            }
        }
        println!();
    }

    println!("{}", "=".repeat(80));
    println!("To write the reports, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn print_human_readable_summary(summary: &BatchSummary) {
    println!("\n{}", "=".repeat(80));
    println!("PROFILING SUMMARY");
    println!("{}", "=".repeat(80));

    for outcome in &summary.outcomes {
        match &outcome.status {
            OutcomeStatus::Written { report_path } => {
                println!("  OK      {} -> {}", outcome.source, report_path.display());
            }
            OutcomeStatus::Failed { error } => {
                println!("  FAILED  {} ({})", outcome.source, error);
            }
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "  {} written, {} failed in {} ms",
        summary.written_count(),
        summary.failed_count(),
        summary.duration_ms()
    );
    println!("{}", "=".repeat(80));
}
