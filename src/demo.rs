//! # Demo Data Synthesis
//!
//! Synthetic stand-ins for the real inputs: a monthly Greenland mass-anomaly
//! table and a dh/dt elevation-change grid with two drawdown hotspots. Both
//! are seeded so repeated runs produce identical files.

use chrono::NaiveDate;
use log::info;
use ndarray::Array2;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::fs::File;
use std::path::Path;

/// First month of the synthetic record.
pub const START_YEAR: i32 = 2002;

/// Default number of monthly samples (2002-01 through 2024-12).
pub const DEFAULT_MONTHS: usize = 276;

/// Default edge length of the synthetic dh/dt grid.
pub const DEFAULT_GRID_SIZE: usize = 220;

/// Builds the synthetic monthly mass-anomaly table: a linear trend from
/// 0 to -3500 Gt, an 80 Gt seasonal cycle and Gaussian noise (sigma 40).
///
/// The returned frame has a `date` column (month starts, date dtype) and a
/// `mass_anomaly_gt` column.
pub fn demo_mass_anomaly(months: usize, seed: u64) -> Result<DataFrame, Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 40.0)?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

    let mut days = Vec::with_capacity(months);
    let mut mass = Vec::with_capacity(months);
    for i in 0..months {
        let year = START_YEAR + (i / 12) as i32;
        let month = (i % 12) as u32 + 1;
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| format!("invalid month index {i}"))?;
        days.push((date - epoch).num_days() as i32);

        let trend = if months > 1 {
            -3500.0 * i as f64 / (months - 1) as f64
        } else {
            0.0
        };
        let season = 80.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin();
        mass.push(trend + season + noise.sample(&mut rng));
    }

    let date = Int32Chunked::from_vec("date".into(), days)
        .into_date()
        .into_series();
    let df = DataFrame::new(vec![
        date.into(),
        Series::new("mass_anomaly_gt".into(), mass).into(),
    ])?;
    Ok(df)
}

/// Writes the mass-anomaly table as CSV, creating parent directories.
pub fn write_mass_anomaly_csv(
    df: &mut DataFrame,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    info!("wrote mass anomaly table: {}", path.display());
    Ok(())
}

/// Builds the synthetic dh/dt grid on [-1, 1] x [-1, 1]: a thinning bowl
/// with two Gaussian drawdown hotspots and mild noise.
pub fn demo_elevation_grid(ny: usize, nx: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).expect("valid normal parameters");

    Array2::from_shape_fn((ny, nx), |(j, i)| {
        let y = -1.0 + 2.0 * j as f64 / (ny.max(2) - 1) as f64;
        let x = -1.0 + 2.0 * i as f64 / (nx.max(2) - 1) as f64;
        let base = -2.5 * (1.0 - (x * x + y * y));
        let hotspot1 = -1.2 * (-((x - 0.7).powi(2) + (y + 0.5).powi(2)) / 0.02).exp();
        let hotspot2 = -0.9 * (-((x + 0.6).powi(2) + (y - 0.6).powi(2)) / 0.03).exp();
        base + hotspot1 + hotspot2 + 0.15 * noise.sample(&mut rng)
    })
}

/// Writes the grid to a NetCDF file with the variable at the root group,
/// the layout a flat, ungrouped product file would use.
pub fn write_elevation_netcdf(
    path: &Path,
    grid: &Array2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "Synthetic Greenland elevation change")?;
    file.add_attribute("source", "icevis demo generator")?;

    let (ny, nx) = grid.dim();
    file.add_dimension("y", ny)?;
    file.add_dimension("x", nx)?;

    put_axis(&mut file, "y", ny)?;
    put_axis(&mut file, "x", nx)?;

    let mut var = file.add_variable::<f64>("dhdt", &["y", "x"])?;
    var.put_attribute("units", "m yr-1")?;
    var.put_attribute("long_name", "rate of elevation change")?;
    let flat: Vec<f64> = grid.iter().copied().collect();
    var.put_values(&flat, ..)?;

    info!("wrote elevation grid: {}", path.display());
    Ok(())
}

/// Writes the grid nested under a `grids` group, the layout some ICESat
/// products use. Exercises the locator's recursive tier.
pub fn write_grouped_elevation_netcdf(
    path: &Path,
    grid: &Array2<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = netcdf::create(path)?;
    file.add_attribute("title", "Synthetic Greenland elevation change (grouped)")?;

    let (ny, nx) = grid.dim();
    let mut grp = file.add_group("grids")?;
    grp.add_dimension("y", ny)?;
    grp.add_dimension("x", nx)?;

    let mut var = grp.add_variable::<f64>("dhdt", &["y", "x"])?;
    var.put_attribute("units", "m yr-1")?;
    let flat: Vec<f64> = grid.iter().copied().collect();
    var.put_values(&flat, ..)?;

    info!("wrote grouped elevation grid: {}", path.display());
    Ok(())
}

fn put_axis(file: &mut netcdf::FileMut, name: &str, len: usize) -> Result<(), netcdf::Error> {
    let mut var = file.add_variable::<f64>(name, &[name])?;
    var.put_attribute("long_name", format!("normalized {name} coordinate"))?;
    let coords: Vec<f64> = (0..len)
        .map(|i| -1.0 + 2.0 * i as f64 / (len.max(2) - 1) as f64)
        .collect();
    var.put_values(&coords, ..)?;
    Ok(())
}
