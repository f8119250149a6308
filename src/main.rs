//! Date Hierarchy - Main entry point
//!
//! Resolves selections into filter ranges and prints drill-down navigation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use date_hierarchy::{
    config::Config, display, resolve_with, HierarchySelection, Navigation, Policy, PolicyKind,
    RangeFilter, Zone,
};

#[derive(Parser)]
#[command(name = "date-hierarchy")]
#[command(author, version, about = "Calendar drill-down and date range filters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the half-open range covered by a selection
    Range {
        /// Selected year
        #[arg(long)]
        year: i32,

        /// Selected month (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Selected day of month
        #[arg(long)]
        day: Option<u32>,

        /// Produce a naive range regardless of configuration
        #[arg(long, conflicts_with = "tz")]
        naive: bool,

        /// IANA time zone or fixed offset to attach, e.g. Europe/Berlin or +02:00
        #[arg(long)]
        tz: Option<String>,
    },

    /// Show the choices one level below a selection
    Drilldown {
        /// Selected year
        #[arg(long)]
        year: Option<i32>,

        /// Selected month (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Selected day of month
        #[arg(long)]
        day: Option<u32>,

        /// Which dates to offer
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Years offered at the top level by the past-only policy
        #[arg(long)]
        past_years: Option<u32>,

        /// Reference moment (RFC 3339); defaults to the current time
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Default,
    PastOnly,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Default => Self::Default,
            PolicyArg::PastOnly => Self::PastOnly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
    } else {
        Config::load().context("failed to load configuration")?
    };
    config.validate()?;

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Range {
            year,
            month,
            day,
            naive,
            tz,
        } => run_range(&config, cli.json, (year, month, day), naive, tz.as_deref()),

        Commands::Drilldown {
            year,
            month,
            day,
            policy,
            past_years,
            as_of,
        } => {
            let kind = policy.map_or(config.drilldown.policy, PolicyKind::from);
            let policy = Policy::new(kind, past_years.unwrap_or(config.drilldown.past_years));
            let as_of = reference_moment(as_of.as_deref())?;
            run_drilldown(cli.json, (year, month, day), &policy, &as_of)
        }

        Commands::Config { show, init } => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }
    }
}

/// The reference moment for past-only filtering, read once per run.
fn reference_moment(as_of: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match as_of {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --as-of moment '{s}'")),
        None => Ok(Local::now().fixed_offset()),
    }
}

fn run_range(
    config: &Config,
    json: bool,
    (year, month, day): (i32, Option<u32>, Option<u32>),
    naive: bool,
    tz: Option<&str>,
) -> Result<()> {
    let selection = HierarchySelection::from_parts(Some(year), month, day)?
        .context("a range needs at least a year")?;

    let zone = match (naive, tz) {
        (true, _) => None,
        (false, Some(tz)) => Some(tz.parse::<Zone>()?),
        (false, None) => config.timezone()?,
    };
    debug!(%selection, zone = ?zone.map(|z| z.to_string()), "Resolving range");

    let range = resolve_with(&selection, zone)?;
    let filter = RangeFilter::new(&config.range.field, range)?;

    if json {
        let (clause, params) = filter.clause();
        let out = serde_json::json!({
            "selection": selection,
            "range": range,
            "filter": { "clause": clause, "params": params },
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        display::display_range(&selection, &range, &filter);
    }
    Ok(())
}

fn run_drilldown(
    json: bool,
    (year, month, day): (Option<i32>, Option<u32>, Option<u32>),
    policy: &Policy,
    as_of: &DateTime<FixedOffset>,
) -> Result<()> {
    let selection = HierarchySelection::from_parts(year, month, day)?;
    debug!(policy = %policy.kind(), as_of = %as_of.to_rfc3339(), "Building drill-down");

    let nav = Navigation::build(selection.as_ref(), policy, as_of)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&nav)?);
    } else {
        display::display_navigation(&nav);
    }
    Ok(())
}
