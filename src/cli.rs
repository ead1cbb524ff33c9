//! # CLI Module
//!
//! Command-line interface for icevis:
//! - Argument parsing with clap
//! - Configuration file loading (JSON/YAML) with per-flag overrides
//! - Environment variable support with the ICEVIS_ prefix
//! - Subcommands for the demo, figure and inspection operations
//! - Shell completion generation

use crate::info::{
    get_netcdf_info, print_file_info_csv, print_file_info_human, print_file_info_json,
    print_file_info_yaml,
};
use crate::input::JobConfig;
use crate::locate::GridLocator;
use crate::log::{config_echo, show_farewell_with_timing, show_greeting, show_selection};
use crate::{DemoOptions, process_demo_job, process_hotspots_job, process_timeseries_job, process_trend_job};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Instant;

/// Greenland ice-sheet visualization toolkit
#[derive(Parser, Debug)]
#[command(name = "icevis")]
#[command(about = "Render Greenland ice-sheet figures from NetCDF grids and mass-anomaly tables")]
#[command(version)]
#[command(long_about = "
icevis loads gridded elevation-change rasters and monthly mass-anomaly tables,
computes derived statistics (decile hotspots, seasonal-trend decomposition,
annual means) and renders PNG figures.

The dh/dt grid variable is discovered heuristically: root variables are
matched by name hints first, and files whose grids hide in nested groups are
scanned recursively with a name/dimension/area score.

EXAMPLES:
  # Generate synthetic inputs and baseline figures
  icevis demo

  # Render the hotspot mask from a real product
  icevis hotspots --input data/raw/icesat/greenland_elev_change.nc

  # Decompose the monthly series and plot the trend
  icevis trend --period 12

  # Which variable would be picked, and why
  icevis locate data/raw/icesat/greenland_elev_change.nc

  # Inspect file structure
  icevis info data.nc --detailed --format json
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path (JSON or YAML)
    #[arg(short, long, global = true, env = "ICEVIS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic demo inputs and baseline figures
    #[command(long_about = "
Generate the synthetic mass-anomaly table and dh/dt grid, then render the
baseline time-series and elevation-change figures.

EXAMPLES:
  icevis demo
  icevis demo --months 120 --grid-size 128x256 --seed 7
  icevis demo --grouped   # bury the grid in a nested group
")]
    Demo {
        /// Number of monthly samples to synthesize
        #[arg(long, default_value_t = crate::demo::DEFAULT_MONTHS, env = "ICEVIS_MONTHS")]
        months: usize,

        /// Grid dimensions as ROWSxCOLS
        #[arg(long, value_parser = parse_grid_size, default_value = "220x220")]
        grid_size: (usize, usize),

        /// RNG seed for reproducible outputs
        #[arg(long, default_value_t = 42, env = "ICEVIS_SEED")]
        seed: u64,

        /// Nest the grid variable under a group instead of the root
        #[arg(long)]
        grouped: bool,
    },

    /// Render the top/bottom-decile hotspot mask of the dh/dt grid
    #[command(long_about = "
Locate the dh/dt grid inside the NetCDF file, compute the lower/upper
quantile thresholds and render the hotspot mask.

EXAMPLES:
  icevis hotspots
  icevis hotspots --input other_product.nc --lower 0.05 --upper 0.95
")]
    Hotspots {
        /// Override the input NetCDF path from the config
        #[arg(long, env = "ICEVIS_INPUT")]
        input: Option<String>,

        /// Lower quantile threshold
        #[arg(long)]
        lower: Option<f64>,

        /// Upper quantile threshold
        #[arg(long)]
        upper: Option<f64>,
    },

    /// Decompose the monthly mass series and plot its trend
    Trend {
        /// Override the input CSV path from the config
        #[arg(long, env = "ICEVIS_CSV")]
        input: Option<String>,

        /// Seasonal period in samples
        #[arg(long)]
        period: Option<usize>,
    },

    /// Plot the monthly mass series with annual means overlaid
    Timeseries {
        /// Override the input CSV path from the config
        #[arg(long, env = "ICEVIS_CSV")]
        input: Option<String>,
    },

    /// Show which grid variable would be selected from a NetCDF file
    Locate {
        /// NetCDF file path
        file: String,
    },

    /// Show information about a NetCDF file
    #[command(long_about = "
Inspect NetCDF files and display structure information, including variables
nested in groups.

EXAMPLES:
  icevis info data.nc
  icevis info data.nc --detailed
  icevis info data.nc -n dhdt --format json
")]
    Info {
        /// NetCDF file path
        file: String,

        /// Show global attributes as well
        #[arg(long)]
        detailed: bool,

        /// Show only specific variable info
        #[arg(short = 'n', long)]
        variable: Option<String>,

        /// Output format for file information
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON structured output
    Json,
    /// YAML structured output
    Yaml,
    /// CSV output (variables only)
    Csv,
}

/// Parse grid dimensions from the command line.
/// Format: ROWSxCOLS, e.g. 220x220
pub fn parse_grid_size(s: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err("Grid size must be in format 'ROWSxCOLS'".to_string());
    }
    let rows = parts[0]
        .parse::<usize>()
        .map_err(|_| "Invalid row count in grid size")?;
    let cols = parts[1]
        .parse::<usize>()
        .map_err(|_| "Invalid column count in grid size")?;
    if rows == 0 || cols == 0 {
        return Err("Grid dimensions must be positive".to_string());
    }
    Ok((rows, cols))
}

/// Loads the job config from `--config` when given, defaults otherwise.
fn load_config(cli: &Cli) -> Result<JobConfig, Box<dyn std::error::Error>> {
    match &cli.config {
        Some(path) => JobConfig::from_file(path),
        None => Ok(JobConfig::default()),
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

/// Parses arguments, dispatches the subcommand and reports timing.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);
    let start_time = Instant::now();

    match &cli.command {
        Commands::Demo {
            months,
            grid_size,
            seed,
            grouped,
        } => {
            let config = echo_config(&cli)?;
            let opts = DemoOptions {
                months: *months,
                grid_size: *grid_size,
                seed: *seed,
                grouped: *grouped,
            };
            process_demo_job(&config, &opts)?;
        }

        Commands::Hotspots { input, lower, upper } => {
            let mut config = echo_config(&cli)?;
            if let Some(input) = input {
                config.nc_key = input.clone();
            }
            if let Some(lower) = lower {
                config.hotspot.lower = *lower;
            }
            if let Some(upper) = upper {
                config.hotspot.upper = *upper;
            }
            let selection = process_hotspots_job(&config)?;
            if !cli.quiet {
                show_selection(&selection);
            }
        }

        Commands::Trend { input, period } => {
            let mut config = echo_config(&cli)?;
            if let Some(input) = input {
                config.csv_key = input.clone();
            }
            if let Some(period) = period {
                config.trend.period = *period;
            }
            process_trend_job(&config)?;
        }

        Commands::Timeseries { input } => {
            let mut config = echo_config(&cli)?;
            if let Some(input) = input {
                config.csv_key = input.clone();
            }
            process_timeseries_job(&config)?;
        }

        Commands::Locate { file } => {
            let selection = GridLocator::new().locate_path(file)?;
            show_selection(&selection);
        }

        Commands::Info {
            file,
            detailed,
            variable,
            format,
        } => {
            let info = get_netcdf_info(file, variable.as_deref(), *detailed)?;
            match format {
                OutputFormat::Human => print_file_info_human(&info),
                OutputFormat::Json => print_file_info_json(&info)?,
                OutputFormat::Yaml => print_file_info_yaml(&info)?,
                OutputFormat::Csv => print_file_info_csv(&info)?,
            }
        }

        Commands::Completions { shell, output } => {
            let mut cmd = Cli::command();
            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(path)?;
                    clap_complete::generate(*shell, &mut cmd, "icevis", &mut file);
                }
                None => {
                    clap_complete::generate(*shell, &mut cmd, "icevis", &mut std::io::stdout());
                }
            }
        }
    }

    if !cli.quiet && job_command(&cli.command) {
        show_farewell_with_timing(start_time.elapsed());
    }
    Ok(())
}

/// Loads the config and echoes it unless quiet. Used by job subcommands.
fn echo_config(cli: &Cli) -> Result<JobConfig, Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    if !cli.quiet {
        if let Some(path) = &cli.config {
            show_greeting(&path.display().to_string());
        }
        config_echo(&config);
    }
    Ok(config)
}

fn job_command(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Demo { .. }
            | Commands::Hotspots { .. }
            | Commands::Trend { .. }
            | Commands::Timeseries { .. }
    )
}
