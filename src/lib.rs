//! # icevis
//!
//! A small toolkit for visualizing Greenland ice-sheet data: it discovers
//! the elevation-change grid inside (possibly deeply grouped) NetCDF files,
//! computes a few derived statistics and renders PNG figures.
//!
//! ## Features
//!
//! - **Grid discovery**: two-tier heuristic locating the dh/dt variable by
//!   name hints, spatial dimension names and trailing 2-D footprint
//! - **Derived statistics**: decile thresholds and hotspot masks, annual
//!   means, seasonal-trend decomposition of the mass-anomaly series
//! - **Rendering**: heatmap, mask and line-chart PNGs
//! - **Demo data**: seeded synthetic inputs for every job
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use icevis::{process_hotspots_job, input::JobConfig};
//!
//! let config = JobConfig::from_file("config.json").expect("Failed to load config");
//! let selection = process_hotspots_job(&config).expect("Failed to render hotspots");
//! println!("used {}:{}", selection.group_label(), selection.variable);
//! ```

pub mod cli;
pub mod demo;
pub mod info;
pub mod input;
pub mod locate;
pub mod log;
pub mod render;
pub mod stats;

#[cfg(test)]
mod tests;


use crate::input::JobConfig;
use crate::locate::{GridLocator, Selection};
use crate::render::LineSeries;
use ::log::warn;
use image::Rgb;
use ndarray::{Array2, ArrayD, Axis, Ix2};
use polars::prelude::*;
use std::error::Error;
use std::path::Path;

const MONTHLY_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
const ANNUAL_COLOR: Rgb<u8> = Rgb([255, 140, 0]);
const TREND_COLOR: Rgb<u8> = Rgb([178, 24, 43]);

/// Options for synthetic-input generation.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub months: usize,
    pub grid_size: (usize, usize),
    pub seed: u64,
    /// Write the grid nested under a group instead of at the root
    pub grouped: bool,
}

impl Default for DemoOptions {
    fn default() -> Self {
        DemoOptions {
            months: demo::DEFAULT_MONTHS,
            grid_size: (demo::DEFAULT_GRID_SIZE, demo::DEFAULT_GRID_SIZE),
            seed: 42,
            grouped: false,
        }
    }
}

/// Generates the synthetic inputs and the two baseline figures.
pub fn process_demo_job(config: &JobConfig, opts: &DemoOptions) -> Result<(), Box<dyn Error>> {
    let mut df = demo::demo_mass_anomaly(opts.months, opts.seed)?;
    demo::write_mass_anomaly_csv(&mut df, Path::new(&config.csv_key))?;

    let (ny, nx) = opts.grid_size;
    let grid = demo::demo_elevation_grid(ny, nx, opts.seed);
    let nc_path = Path::new(&config.nc_key);
    if opts.grouped {
        demo::write_grouped_elevation_netcdf(nc_path, &grid)?;
    } else {
        demo::write_elevation_netcdf(nc_path, &grid)?;
    }

    render::render_grid_map(&grid, &config.figure_path("elevation_change_map.png"))?;
    render_monthly_and_annual(&df, &config.figure_path("mass_balance_timeseries.png"))?;
    Ok(())
}

/// Locates the dh/dt grid, masks its top/bottom quantile tails and renders
/// the hotspot figure. Returns the variable selection that was used.
pub fn process_hotspots_job(config: &JobConfig) -> Result<Selection, Box<dyn Error>> {
    let file = netcdf::open(&config.nc_key)?;
    let selection = GridLocator::new().locate(&file)?;

    let grid = read_grid(&file, &selection)?;
    let (lo, hi) = stats::decile_thresholds(&grid, &config.hotspot)?;
    let mask = stats::hotspot_mask(&grid, lo, hi);

    render::render_mask(&mask, &config.figure_path("elevation_hotspots.png"))?;
    file.close()?;
    Ok(selection)
}

/// Decomposes the monthly series and renders the trend component.
pub fn process_trend_job(config: &JobConfig) -> Result<(), Box<dyn Error>> {
    let df = read_mass_anomaly_or_demo(config)?;
    let values = mass_values(&df)?;
    let decomposition = stats::seasonal_decompose(&values, config.trend.period)?;

    let series = vec![LineSeries::from_values(&decomposition.trend, TREND_COLOR)];
    render::render_line_chart(
        &series,
        880,
        330,
        &config.figure_path("mass_balance_trend_stl.png"),
    )?;
    Ok(())
}

/// Renders the monthly series with its annual means overlaid.
pub fn process_timeseries_job(config: &JobConfig) -> Result<(), Box<dyn Error>> {
    let df = read_mass_anomaly_or_demo(config)?;
    render_monthly_and_annual(&df, &config.figure_path("mass_balance_timeseries.png"))
}

fn render_monthly_and_annual(df: &DataFrame, path: &Path) -> Result<(), Box<dyn Error>> {
    let value_col = mass_column(df)?;
    let values = mass_values(df)?;
    let annual = stats::annual_means(df, "date", &value_col)?;

    let years = annual.column("year")?.as_materialized_series().i32()?;
    let means = annual.column(&value_col)?.as_materialized_series().f64()?;
    let first_year = years.into_iter().flatten().min().unwrap_or(0);

    let mut annual_xs = Vec::new();
    let mut annual_ys = Vec::new();
    for (year, mean) in years.into_iter().zip(means) {
        if let (Some(year), Some(mean)) = (year, mean) {
            // plot each annual mean at the middle of its year
            annual_xs.push(((year - first_year) * 12) as f64 + 5.5);
            annual_ys.push(mean);
        }
    }

    let series = vec![
        LineSeries::from_values(&values, MONTHLY_COLOR),
        LineSeries {
            xs: annual_xs,
            ys: annual_ys,
            color: ANNUAL_COLOR,
        },
    ];
    render::render_line_chart(&series, 880, 440, path)
}

/// Reads the mass-anomaly CSV with date parsing, or falls back to a
/// synthetic table when the file does not exist.
pub fn read_mass_anomaly_or_demo(config: &JobConfig) -> Result<DataFrame, Box<dyn Error>> {
    let path = Path::new(&config.csv_key);
    if !path.exists() {
        warn!(
            "mass anomaly table {} not found, using synthetic data",
            path.display()
        );
        return demo::demo_mass_anomaly(demo::DEFAULT_MONTHS, 42);
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Picks the mass column: `mass_anomaly_gt` when present, otherwise the
/// first float column. The table layouts in circulation disagree on the
/// column name.
pub fn mass_column(df: &DataFrame) -> Result<String, Box<dyn Error>> {
    if df.column("mass_anomaly_gt").is_ok() {
        return Ok("mass_anomaly_gt".to_string());
    }
    for (name, dtype) in df.schema().iter() {
        if matches!(dtype, &DataType::Float64 | &DataType::Float32) {
            return Ok(name.to_string());
        }
    }
    Err("no numeric mass column found in table".into())
}

/// Extracts the mass series as `f64` (casting narrower float columns up),
/// nulls mapped to NaN and then filled by linear interpolation.
pub fn mass_values(df: &DataFrame) -> Result<Vec<f64>, Box<dyn Error>> {
    let value_col = mass_column(df)?;
    let mut values: Vec<f64> = df
        .column(&value_col)?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect();
    stats::fill_gaps_linear(&mut values);
    Ok(values)
}

/// Reads the selected variable as a 2-D grid, dropping length-1 leading
/// axes first (single-band products wrap the grid in a band dimension).
pub fn read_grid(file: &netcdf::File, selection: &Selection) -> Result<Array2<f64>, Box<dyn Error>> {
    let var = variable_at(file, &selection.group, &selection.variable).ok_or_else(|| {
        format!(
            "variable '{}' not found in group '{}'",
            selection.variable,
            selection.group_label()
        )
    })?;
    let arr = var.get::<f64, _>(..)?;
    let squeezed = squeeze(arr);
    let grid = squeezed
        .into_dimensionality::<Ix2>()
        .map_err(|_| format!("variable '{}' is not a 2-D grid", selection.variable))?;
    Ok(grid)
}

/// Resolves a variable by group path, empty path meaning the root group.
pub fn variable_at<'f>(
    file: &'f netcdf::File,
    group_path: &str,
    name: &str,
) -> Option<netcdf::Variable<'f>> {
    if group_path.is_empty() {
        return file.variable(name);
    }
    file.variable(&format!("{group_path}/{name}"))
}

fn squeeze(mut arr: ArrayD<f64>) -> ArrayD<f64> {
    while arr.ndim() > 2 {
        let Some(axis) = arr.shape().iter().position(|&s| s == 1) else {
            break;
        };
        arr = arr.index_axis_move(Axis(axis), 0);
    }
    arr
}
