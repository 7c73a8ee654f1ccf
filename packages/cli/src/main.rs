#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the accident dashboard.
//!
//! `serve` runs the dashboard host, `report` writes a static dashboard and
//! both CSV exports to a directory, and `summary` prints the aggregations.
//! Without a subcommand an interactive menu asks what to do.

mod report;
mod summary;

use std::path::{Path, PathBuf};

use accident_dashboard_analytics::render;
use accident_dashboard_analytics_models::FilterState;
use accident_dashboard_config::DashboardConfig;
use accident_dashboard_dataset::{DatasetSource, load};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Select};

#[derive(Parser)]
#[command(name = "accident_dashboard", about = "Imus City vehicle accident dashboard")]
struct Cli {
    /// Config file (defaults to `dashboard.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Default dataset, overriding the config file and environment
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard host
    Serve {
        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write `dashboard.html`, `filtered_data.csv`, and `original_data.csv`
    Report {
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        /// CSV to analyse instead of the default dataset, as if uploaded
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print the aggregations for a filter
    Summary {
        /// CSV to analyse instead of the default dataset
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Filter selections shared by `report` and `summary`.
#[derive(Args, Debug)]
struct FilterArgs {
    /// Earliest date to keep (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Latest date to keep (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Barangay to keep (repeat for more)
    #[arg(long = "barangay")]
    barangays: Vec<String>,
    /// Incident type to keep (repeat for more)
    #[arg(long = "incident-type")]
    incident_types: Vec<String>,
    /// Offense to keep (repeat for more)
    #[arg(long = "offense")]
    offenses: Vec<String>,
}

impl From<FilterArgs> for FilterState {
    fn from(args: FilterArgs) -> Self {
        let clean = |values: Vec<String>| {
            values
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect()
        };
        Self {
            start: args.start,
            end: args.end,
            barangays: clean(args.barangays),
            incident_types: clean(args.incident_types),
            offenses: clean(args.offenses),
        }
    }
}

/// Top-level actions offered by the interactive menu.
enum Action {
    Serve,
    Report,
    Summary,
}

impl Action {
    const ALL: &[Self] = &[Self::Serve, Self::Report, Self::Summary];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start dashboard server",
            Self::Report => "Write static report",
            Self::Summary => "Print summary",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(dataset) = cli.dataset {
        config.default_dataset = dataset;
    }

    let Some(command) = cli.command else {
        return interactive(config).await;
    };

    match command {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Commands::Report { out, input, filter } => {
            run_report(&config, &out, input.as_deref(), &filter.into())?;
        }
        Commands::Summary { input, filter } => {
            run_summary(&config, input.as_deref(), &filter.into())?;
        }
    }

    Ok(())
}

async fn interactive(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config.title);
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Serve => {
            // The server uses actix-web's runtime, so it runs in a blocking
            // task to avoid nesting runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(accident_dashboard_server::interactive::run(config))
            })
            .await??;
        }
        Action::Report => {
            let out: String = Input::new()
                .with_prompt("Output directory")
                .default("report".to_string())
                .interact_text()?;
            run_report(&config, Path::new(&out), None, &FilterState::default())?;
        }
        Action::Summary => run_summary(&config, None, &FilterState::default())?,
    }

    Ok(())
}

async fn serve(config: DashboardConfig) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(accident_dashboard_server::run_server(config))
    })
    .await?
}

fn run_report(
    config: &DashboardConfig,
    out: &Path,
    input: Option<&Path>,
    filter: &FilterState,
) -> Result<(), Box<dyn std::error::Error>> {
    let upload = input.map(report::read_upload).transpose()?;
    let written = report::write_report(out, config, upload, filter)?;

    println!(
        "Wrote {}, {}, and {} to {} ({} of {} rows)",
        report::PAGE_FILE,
        report::FILTERED_FILE,
        report::ORIGINAL_FILE,
        out.display(),
        written.filtered_rows,
        written.total_rows,
    );
    Ok(())
}

fn run_summary(
    config: &DashboardConfig,
    input: Option<&Path>,
    filter: &FilterState,
) -> Result<(), Box<dyn std::error::Error>> {
    let upload = input.map(report::read_upload).transpose()?;
    let dataset = load(&DatasetSource::resolve(upload, &config.default_dataset))?;
    let rendered = render(&dataset, filter)?;

    print!("{}", summary::format_summary(&rendered.outputs));
    Ok(())
}
