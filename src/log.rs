use crate::input::JobConfig;
use crate::locate::Selection;
use std::time::Duration;

pub fn show_greeting(config_path: &str) {
    println!("=== Greenland Ice Sheet Visualization ===");
    println!("Loading configuration from: {}", config_path);
}

pub fn config_echo(config: &JobConfig) {
    println!("\nConfiguration:");
    println!("  Elevation NetCDF: {}", config.nc_key);
    println!("  Mass anomaly CSV: {}", config.csv_key);
    println!("  Figures directory: {}", config.figures_dir);
    println!(
        "  Hotspot quantiles: {:.2} / {:.2}",
        config.hotspot.lower, config.hotspot.upper
    );
    println!("  Seasonal period: {} months", config.trend.period);
}

pub fn show_selection(selection: &Selection) {
    println!("\nSelected grid variable:");
    println!("  Group: {}", selection.group_label());
    println!("  Variable: {}", selection.variable);
    println!("  Confidence: {:?}", selection.confidence);
}

pub fn show_farewell_with_timing(elapsed: Duration) {
    println!("\n=== Done in {:.2}s ===", elapsed.as_secs_f64());
}
