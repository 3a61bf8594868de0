//! Radio Music Collector main entry point
//!
//! This is the command-line interface for collecting and compiling the songs
//! played on radio stations.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use radio_music_collector::collector::{run_get, GetOptions};
use radio_music_collector::compile::{run_compile, CompileOptions, OutputFormat, SongOrder};
use radio_music_collector::config::{load_config_with_hash, validate, Config};
use radio_music_collector::date_range::{parse_date, resolve_date_ranges};
use radio_music_collector::output::{select_reporter, Reporter};
use radio_music_collector::station::{select_stations, ALL_STATIONS};
use radio_music_collector::storage::open_storage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Radio Music Collector: collects and handles music played at radio stations
#[derive(Parser, Debug)]
#[command(name = "radio-music-collector")]
#[command(version)]
#[command(about = "Collects and handles music played at radio stations", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding the collected data
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Report through GitHub Actions workflow commands
    #[arg(long, global = true)]
    gh_action: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the songs every station played on a day
    Get(GetArgs),

    /// Compile stored days into song lists
    Compile(CompileArgs),

    /// List the configured stations
    Stations,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// For what date to get songs, e.g. `yesterday` or `2024-03-07`
    #[arg(value_name = "DATE")]
    date: String,

    /// Milliseconds to wait between station requests
    #[arg(long = "fetchDelay", value_name = "MS")]
    fetch_delay: Option<u64>,

    /// Also poll stations marked as not fetchable
    #[arg(long = "allStations")]
    all_stations: bool,

    /// Fail if any station fails
    #[arg(long)]
    require_all: bool,

    /// Also write a deduplicated `Artist - Track` list per station
    #[arg(long)]
    list: bool,
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Radio stations for which to compile music lists, or `all`
    #[arg(short = 'S', long = "station", value_name = "NAME", required = true)]
    stations: Vec<String>,

    /// For what range of time to compile the data
    #[arg(short = 'D', long, value_name = "RANGE")]
    date: String,

    /// Error if there is no data for every date in the range
    #[arg(long)]
    no_missing: bool,

    /// Format of the output
    #[arg(short = 'O', long, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Order of the output songs
    #[arg(long, default_value_t = SongOrder::Chronological)]
    order: SongOrder,

    /// Reverse the order of the output
    #[arg(short = 'R', long)]
    reverse: bool,

    /// Limit length of the output
    #[arg(short = 'L', long)]
    limit: Option<usize>,

    /// Filter out duplicates
    #[arg(short = 'U', long)]
    unique: bool,

    /// Keep each day in stored order instead of oldest first
    #[arg(long)]
    keep_day_order: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = prepare_config(&cli)?;
    let reporter = select_reporter(cli.gh_action);
    let now = chrono::Local::now().naive_local();

    let result = match cli.command {
        Command::Get(args) => handle_get(config, args, &now, reporter.as_ref()).await,
        Command::Compile(args) => handle_compile(&config, args, &now, reporter.as_ref()),
        Command::Stations => {
            print_stations(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("radio_music_collector=info,warn"),
            1 => EnvFilter::new("radio_music_collector=debug,info"),
            2 => EnvFilter::new("radio_music_collector=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Loads the configuration and applies the global overrides
///
/// The result is validated for every command, so a bad `--data-dir` is
/// rejected before anything is read or written.
fn prepare_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(data_dir) = &cli.data_dir {
        config.collector.data_dir = data_dir.display().to_string();
    }
    validate(&config)?;

    Ok(config)
}

/// Handles the `get` command
async fn handle_get(
    mut config: Config,
    args: GetArgs,
    now: &chrono::NaiveDateTime,
    reporter: &dyn Reporter,
) -> anyhow::Result<()> {
    let date = parse_date(&args.date, now)?;

    if let Some(delay) = args.fetch_delay {
        config.collector.fetch_delay_ms = delay;
    }
    if args.require_all {
        config.collector.require_all = true;
    }
    validate(&config)?;

    let mut options = GetOptions::from_config(&config, date);
    options.include_unfetchable = args.all_stations;
    options.write_list = args.list;

    tracing::info!(
        "Getting songs for {} with {:?} between requests",
        date,
        Duration::from_millis(config.collector.fetch_delay_ms)
    );

    let storage = open_storage(Path::new(&config.collector.data_dir));
    run_get(&config, &storage, &options, reporter).await?;

    Ok(())
}

/// Handles the `compile` command
fn handle_compile(
    config: &Config,
    args: CompileArgs,
    now: &chrono::NaiveDateTime,
    reporter: &dyn Reporter,
) -> anyhow::Result<()> {
    let stations = select_stations(&config.stations, &args.stations)?;
    let dates = resolve_date_ranges(&args.date, now)?;

    for range in &dates.ranges {
        tracing::debug!(
            "Range {} to {} ({})",
            range.start,
            range.end,
            range.precision
        );
    }

    let options = CompileOptions {
        order: args.order,
        format: args.output,
        unique: args.unique,
        reverse: args.reverse,
        limit: args.limit,
        require_all_days: args.no_missing,
        keep_day_order: args.keep_day_order,
    };

    let storage = open_storage(Path::new(&config.collector.data_dir));
    let reports = run_compile(&storage, &stations, &dates, &options, reporter)?;

    for report in &reports {
        tracing::info!("Wrote {}", report.path.display());
    }

    Ok(())
}

/// Prints the configured stations
fn print_stations(config: &Config) {
    println!("Stations ({}):", config.stations.len());
    for station in &config.stations {
        let note = if station.fetchable {
            ""
        } else {
            " (not fetched by default)"
        };
        println!("  - {} [rid {}] {}{}", station.name, station.rid, station.domain, note);
    }
    println!("\nUse `{}` to select every station when compiling", ALL_STATIONS);
}
