use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use football_seed::models::RunSummary;
use football_seed::{ApiClient, CollectionPipeline, Config, JsonStore, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "football-seed")]
#[command(version)]
#[command(about = "Collect API-Football reference data into JSON files")]
struct Args {
    /// Season to collect (overrides SEED_YEAR)
    #[arg(short, long)]
    year: Option<i32>,

    /// Root output directory (overrides OUTPUT_DIR); files land in <root>/year=<year>
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Stop requesting leagues once this many teams were collected (overrides TEAM_LIMIT)
    #[arg(long)]
    team_limit: Option<usize>,

    /// Maximum number of venues to fetch (overrides VENUE_LIMIT)
    #[arg(long)]
    venue_limit: Option<usize>,

    /// Run summary format (text, json)
    #[arg(short, long, default_value = "text")]
    summary: String,

    /// Open the output directory in the file manager when done
    #[arg(long)]
    open: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("football_seed=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load configuration; CLI flags win over the environment
    let mut config = Config::from_env()?;
    if let Some(year) = args.year {
        config.year = year;
    }
    if let Some(ref dir) = args.output_dir {
        config.output_root = dir.clone();
    }
    if let Some(limit) = args.team_limit {
        config.team_limit = limit;
    }
    if let Some(limit) = args.venue_limit {
        config.venue_limit = limit;
    }
    tracing::debug!("Configuration: {:?}", config);

    let store = JsonStore::new(config.output_dir())?;
    let client = ApiClient::new(&config.api_key, &config.base_url, config.request_timeout())?
        .with_retry(config.retry_policy());

    let pipeline = CollectionPipeline::new(client, store, PipelineConfig::from(&config));
    let summary = pipeline.run().await?;

    tracing::info!("Pipeline finished successfully.");
    output_summary(&summary, &args)?;

    if args.open {
        open_dir(&summary.output_dir);
    } else {
        tracing::info!("Output folder: {}", summary.output_dir.display());
    }

    Ok(())
}

fn output_summary(summary: &RunSummary, args: &Args) -> anyhow::Result<()> {
    let output = match args.summary.as_str() {
        "json" => serde_json::to_string_pretty(summary)?,
        _ => format_text(summary),
    };
    println!("{}", output);
    Ok(())
}

fn format_text(summary: &RunSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Seed run: season {} ===\n\n", summary.year));
    output.push_str(&format!("Output: {}\n", summary.output_dir.display()));
    output.push_str(&format!(
        "Duration: {:.1}s\n\n",
        (summary.finished_at - summary.started_at).num_milliseconds() as f64 / 1000.0
    ));

    for report in &summary.steps {
        output.push_str(&format!(
            "  {:<10} {:>6} records, {} file(s)",
            report.step.to_string(),
            report.records,
            report.files.len()
        ));
        if let Some(ref ids) = report.ids {
            output.push_str(&format!(", {} id(s)", ids.len()));
        }
        output.push('\n');
    }

    output.push_str(&format!("\nFiles written: {}\n", summary.files_written()));
    output
}

/// Best-effort: a missing file manager is not an error.
fn open_dir(dir: &Path) {
    let program = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    match Command::new(program).arg(dir).spawn() {
        Ok(_) => tracing::info!("Opened {}", dir.display()),
        Err(e) => tracing::warn!(
            "Could not open {} with {}: {}",
            dir.display(),
            program,
            e
        ),
    }
}
