//! # Input Configuration Module
//!
//! Configuration parsing for icevis jobs. A job config points at the raw
//! elevation-change NetCDF, the monthly mass-anomaly CSV and the directory
//! figures are written to, plus the tunable parameters of the hotspot and
//! trend computations.
//!
//! ## Configuration Structure
//!
//! - **nc_key**: path to the elevation-change NetCDF file
//! - **csv_key**: path to the mass-anomaly CSV table
//! - **figures_dir**: directory PNG figures are rendered into
//! - **hotspot**: lower/upper quantile thresholds (defaults 0.10 / 0.90)
//! - **trend**: seasonal period of the decomposition (default 12 months)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use icevis::input::JobConfig;
//!
//! let config = JobConfig::from_file("config.json")?;
//! println!("Reading grids from: {}", config.nc_key);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for icevis jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Path to the elevation-change NetCDF file
    pub nc_key: String,
    /// Path to the monthly mass-anomaly CSV table
    pub csv_key: String,
    /// Directory figures are written to
    pub figures_dir: String,
    /// Hotspot quantile thresholds
    #[serde(default)]
    pub hotspot: HotspotParams,
    /// Seasonal-trend decomposition parameters
    #[serde(default)]
    pub trend: TrendParams,
}

/// Quantile thresholds delimiting the hotspot deciles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotParams {
    /// Lower quantile (values at or below are hotspots)
    pub lower: f64,
    /// Upper quantile (values at or above are hotspots)
    pub upper: f64,
}

impl Default for HotspotParams {
    fn default() -> Self {
        HotspotParams {
            lower: 0.10,
            upper: 0.90,
        }
    }
}

/// Parameters of the seasonal-trend decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendParams {
    /// Seasonal period in samples (12 for monthly data)
    pub period: usize,
}

impl Default for TrendParams {
    fn default() -> Self {
        TrendParams { period: 12 }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            nc_key: "data/raw/icesat/greenland_elev_change.nc".to_string(),
            csv_key: "data/processed/mass_anomaly.csv".to_string(),
            figures_dir: "figures".to_string(),
            hotspot: HotspotParams::default(),
            trend: TrendParams::default(),
        }
    }
}

impl JobConfig {
    /// Loads a job configuration from a JSON or YAML file, chosen by the
    /// file extension (`.yaml`/`.yml` for YAML, JSON otherwise).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);
        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Loads a job configuration from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_json::from_str(json_str)?;
        Ok(config)
    }

    /// Loads a job configuration from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_yaml::from_str(yaml_str)?;
        Ok(config)
    }

    /// Path of a figure file under `figures_dir`.
    pub fn figure_path(&self, name: &str) -> std::path::PathBuf {
        Path::new(&self.figures_dir).join(name)
    }
}
