use crate::demo;
use crate::input::*;
use crate::locate::*;
use crate::render;
use crate::stats::*;
use ndarray::Array2;
use std::collections::HashSet;
use std::path::Path;
use tempfile::tempdir;

/// Creates a NetCDF file with the given variables at the root group.
/// Dimensions are added on first use, in the order they appear.
fn write_root_vars(
    path: &Path,
    vars: &[(&str, &[(&str, usize)])],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = netcdf::create(path)?;
    let mut added: HashSet<String> = HashSet::new();
    for (name, dims) in vars {
        for (dim, len) in dims.iter() {
            if added.insert(dim.to_string()) {
                file.add_dimension(dim, *len)?;
            }
        }
        let dim_names: Vec<&str> = dims.iter().map(|(d, _)| *d).collect();
        file.add_variable::<f64>(name, &dim_names)?;
    }
    Ok(())
}

/// Creates a NetCDF file whose variables all live in groups; the root
/// stays empty. Groups are created in the order given, with their own
/// dimensions.
fn write_grouped_vars(
    path: &Path,
    groups: &[(&str, &[(&str, &[(&str, usize)])])],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = netcdf::create(path)?;
    for (group_name, vars) in groups {
        let mut grp = file.add_group(group_name)?;
        let mut added: HashSet<String> = HashSet::new();
        for (name, dims) in vars.iter() {
            for (dim, len) in dims.iter() {
                if added.insert(dim.to_string()) {
                    grp.add_dimension(dim, *len)?;
                }
            }
            let dim_names: Vec<&str> = dims.iter().map(|(d, _)| *d).collect();
            grp.add_variable::<f64>(name, &dim_names)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod locate_tests {
    use super::*;

    #[test]
    fn fast_path_prefers_hint_match_over_enumeration_order(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("root_hint.nc");
        write_root_vars(
            &path,
            &[
                ("precip", &[("time", 10)]),
                ("elevation_rate", &[("y", 4), ("x", 5)]),
            ],
        )?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "");
        assert_eq!(selection.variable, "elevation_rate");
        assert_eq!(selection.confidence, Confidence::NameHint);
        Ok(())
    }

    #[test]
    fn fast_path_falls_back_to_first_variable_without_hints(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("root_nohint.nc");
        write_root_vars(
            &path,
            &[("precip", &[("time", 10)]), ("temp", &[("time", 10)])],
        )?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.variable, "precip");
        // The silent first-variable fallback is a heuristic default, not a
        // verified match; the confidence flag is how callers can tell.
        assert_eq!(selection.confidence, Confidence::FirstAvailable);
        Ok(())
    }

    #[test]
    fn fast_path_ignores_shape_entirely() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("root_scalar.nc");
        // A rank-0 variable with a hint name still wins on the fast path.
        write_root_vars(&path, &[("mean_height", &[]), ("grid", &[("y", 8), ("x", 8)])])?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.variable, "mean_height");
        assert_eq!(selection.confidence, Confidence::NameHint);
        Ok(())
    }

    #[test]
    fn group_scan_selects_scored_grid_over_rank1_series(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("grouped.nc");
        write_grouped_vars(
            &path,
            &[(
                "grids",
                &[
                    ("dhdt_2020", &[("y", 100), ("x", 200)]),
                    ("temp", &[("time", 5)]),
                ],
            )],
        )?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "grids");
        assert_eq!(selection.variable, "dhdt_2020");
        assert_eq!(selection.confidence, Confidence::Scored);
        Ok(())
    }

    #[test]
    fn group_scan_prefers_larger_trailing_area() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("area.nc");
        // Same hint status (none), same spatial-dimension status; only the
        // trailing 2-D footprint differs.
        write_grouped_vars(
            &path,
            &[(
                "fields",
                &[
                    ("aaa", &[("r1", 10), ("c1", 10)]),
                    ("bbb", &[("r2", 10), ("c2", 20)]),
                ],
            )],
        )?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.variable, "bbb");
        Ok(())
    }

    #[test]
    fn group_scan_breaks_ties_by_traversal_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("tie.nc");
        write_grouped_vars(
            &path,
            &[
                ("alpha", &[("grid", &[("r1", 10), ("c1", 10)])]),
                ("beta", &[("grid", &[("r2", 10), ("c2", 10)])]),
            ],
        )?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "alpha");
        Ok(())
    }

    #[test]
    fn group_scan_accumulates_nested_paths() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested.nc");
        {
            let mut file = netcdf::create(&path)?;
            let mut outer = file.add_group("outer")?;
            let mut inner = outer.add_group("inner")?;
            inner.add_dimension("y", 6)?;
            inner.add_dimension("x", 7)?;
            inner.add_variable::<f64>("dz", &["y", "x"])?;
        }

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "outer/inner");
        assert_eq!(selection.variable, "dz");
        Ok(())
    }

    #[test]
    fn empty_file_fails_with_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.nc");
        write_root_vars(&path, &[])?;

        let file = netcdf::open(&path)?;
        let result = GridLocator::new().locate(&file);
        assert!(matches!(result, Err(LocateError::NotFound)));
        Ok(())
    }

    #[test]
    fn rank1_only_groups_fail_with_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("rank1.nc");
        write_grouped_vars(&path, &[("series", &[("dhdt", &[("time", 50)])])])?;

        let file = netcdf::open(&path)?;
        let result = GridLocator::new().locate(&file);
        // Even a hint-named variable is excluded below rank 2 on this tier.
        assert!(matches!(result, Err(LocateError::NotFound)));
        Ok(())
    }

    #[test]
    fn scorer_combines_name_dimension_and_area_signals() {
        let scorer = CandidateScorer::default();
        let dims = vec!["y".to_string(), "x".to_string()];
        let score = scorer.score("dhdt_2020", &dims, &[100, 200]).unwrap();
        assert_eq!(score, 1000 + 500 + 20_000);

        let plain = vec!["row".to_string(), "col".to_string()];
        assert_eq!(scorer.score("aux", &plain, &[10, 10]), Some(100));
        assert_eq!(scorer.score("dhdt", &["time".to_string()], &[5]), None);
    }

    #[test]
    fn scorer_is_monotonic_in_trailing_area() {
        let scorer = CandidateScorer::default();
        let dims = vec!["y".to_string(), "x".to_string()];
        let small = scorer.score("elev", &dims, &[10, 10]).unwrap();
        let large = scorer.score("elev", &dims, &[10, 30]).unwrap();
        assert!(large > small);
    }

    #[test]
    fn matcher_is_case_insensitive() {
        let matcher = HintMatcher::default();
        assert!(matcher.matches("ELEVATION_change"));
        assert!(matcher.matches("DHDT"));
        assert!(!matcher.matches("precipitation"));
    }
}

#[cfg(test)]
mod grid_io_tests {
    use super::*;
    use crate::{read_grid, variable_at};

    #[test]
    fn reads_located_grid_from_nested_group() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("grouped_demo.nc");
        let grid = demo::demo_elevation_grid(12, 16, 3);
        demo::write_grouped_elevation_netcdf(&path, &grid)?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "grids");
        assert_eq!(selection.variable, "dhdt");

        let read = read_grid(&file, &selection)?;
        assert_eq!(read.dim(), (12, 16));
        assert!((read[[0, 0]] - grid[[0, 0]]).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn variable_at_resolves_root_and_grouped_paths() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("flat_demo.nc");
        let grid = demo::demo_elevation_grid(6, 6, 3);
        demo::write_elevation_netcdf(&path, &grid)?;

        let file = netcdf::open(&path)?;
        assert!(variable_at(&file, "", "dhdt").is_some());
        assert!(variable_at(&file, "grids", "dhdt").is_none());
        Ok(())
    }

    #[test]
    fn root_layout_is_found_by_fast_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("flat.nc");
        let grid = demo::demo_elevation_grid(8, 8, 1);
        demo::write_elevation_netcdf(&path, &grid)?;

        let file = netcdf::open(&path)?;
        let selection = GridLocator::new().locate(&file)?;
        assert_eq!(selection.group, "");
        assert_eq!(selection.variable, "dhdt");
        assert_eq!(selection.confidence, Confidence::NameHint);
        Ok(())
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn quantile_matches_linear_interpolation() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        assert!((quantile(&values, 0.1).unwrap() - 1.9).abs() < 1e-12);
        assert!((quantile(&values, 0.5).unwrap() - 5.5).abs() < 1e-12);
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(10.0));
    }

    #[test]
    fn quantile_ignores_non_finite_values() {
        let values = vec![f64::NAN, 1.0, 2.0, 3.0, f64::INFINITY];
        // only 1, 2, 3 participate
        assert_eq!(quantile(&values, 0.5), Some(2.0));
        assert_eq!(quantile(&[f64::NAN], 0.5), None);
        assert_eq!(quantile(&values, 1.5), None);
    }

    #[test]
    fn hotspot_mask_marks_both_tails() {
        let grid = Array2::from_shape_vec((1, 5), vec![-5.0, -1.0, 0.0, 1.0, 5.0]).unwrap();
        let mask = hotspot_mask(&grid, -2.0, 2.0);
        assert_eq!(mask.iter().copied().collect::<Vec<u8>>(), vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn decile_thresholds_use_config_quantiles() -> Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let grid = Array2::from_shape_vec((10, 10), values)?;
        let params = HotspotParams::default();
        let (lo, hi) = decile_thresholds(&grid, &params)?;
        assert!((lo - 9.9).abs() < 1e-9);
        assert!((hi - 89.1).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn fill_gaps_interpolates_and_extends_edges() {
        let mut values = vec![f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0, f64::NAN];
        fill_gaps_linear(&mut values);
        assert_eq!(values, vec![1.0, 1.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn fill_gaps_leaves_all_nan_slice_alone() {
        let mut values = vec![f64::NAN, f64::NAN];
        fill_gaps_linear(&mut values);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn decomposition_components_sum_to_input() -> Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (0..48)
            .map(|i| {
                -10.0 * i as f64 + 30.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
            })
            .collect();
        let d = seasonal_decompose(&values, 12)?;
        assert_eq!(d.trend.len(), 48);
        for i in 0..48 {
            let sum = d.trend[i] + d.seasonal[i] + d.remainder[i];
            assert!((sum - values[i]).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn decomposition_seasonal_component_has_zero_mean() -> Result<(), Box<dyn std::error::Error>>
    {
        let values: Vec<f64> = (0..60)
            .map(|i| 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).cos())
            .collect();
        let d = seasonal_decompose(&values, 12)?;
        let mean = d.seasonal.iter().sum::<f64>() / d.seasonal.len() as f64;
        assert!(mean.abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn decomposition_captures_declining_trend() -> Result<(), Box<dyn std::error::Error>> {
        let values: Vec<f64> = (0..48)
            .map(|i| {
                -10.0 * i as f64 + 30.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
            })
            .collect();
        let d = seasonal_decompose(&values, 12)?;
        // interior trend should fall roughly like the underlying slope
        assert!(d.trend[40] < d.trend[10]);
        Ok(())
    }

    #[test]
    fn decomposition_rejects_bad_parameters() {
        let short: Vec<f64> = (0..10).map(|v| v as f64).collect();
        assert!(matches!(
            seasonal_decompose(&short, 12),
            Err(StatsError::SeriesTooShort { len: 10, period: 12 })
        ));
        assert!(matches!(
            seasonal_decompose(&short, 1),
            Err(StatsError::InvalidPeriod(1))
        ));
    }

    #[test]
    fn annual_means_group_by_calendar_year() -> Result<(), Box<dyn std::error::Error>> {
        let df = demo::demo_mass_anomaly(24, 0)?;
        let annual = annual_means(&df, "date", "mass_anomaly_gt")?;
        assert_eq!(annual.height(), 2);
        let years: Vec<i32> = annual
            .column("year")?
            .as_materialized_series()
            .i32()?
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(years, vec![2002, 2003]);
        Ok(())
    }
}

#[cfg(test)]
mod demo_tests {
    use super::*;
    use crate::read_mass_anomaly_or_demo;

    #[test]
    fn mass_anomaly_is_seeded_and_monthly() -> Result<(), Box<dyn std::error::Error>> {
        let a = demo::demo_mass_anomaly(36, 7)?;
        let b = demo::demo_mass_anomaly(36, 7)?;
        assert_eq!(a.height(), 36);
        assert_eq!(a.get_column_names().len(), 2);
        assert!(a.equals_missing(&b));
        Ok(())
    }

    #[test]
    fn mass_anomaly_trends_downward() -> Result<(), Box<dyn std::error::Error>> {
        let df = demo::demo_mass_anomaly(demo::DEFAULT_MONTHS, 42)?;
        let values = crate::mass_values(&df)?;
        let head: f64 = values[..12].iter().sum::<f64>() / 12.0;
        let tail: f64 = values[values.len() - 12..].iter().sum::<f64>() / 12.0;
        assert!(tail < head - 2000.0);
        Ok(())
    }

    #[test]
    fn elevation_grid_is_deterministic_with_hotspot_lows(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let a = demo::demo_elevation_grid(40, 40, 5);
        let b = demo::demo_elevation_grid(40, 40, 5);
        assert_eq!(a, b);

        // the bowl bottoms out near -2.5 at the grid center
        let min = a.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(min < -2.0);
        Ok(())
    }

    #[test]
    fn csv_round_trip_parses_dates() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let csv_path = dir.path().join("mass_anomaly.csv");
        let mut df = demo::demo_mass_anomaly(24, 11)?;
        demo::write_mass_anomaly_csv(&mut df, &csv_path)?;

        let config = JobConfig {
            csv_key: csv_path.display().to_string(),
            ..JobConfig::default()
        };
        let read = read_mass_anomaly_or_demo(&config)?;
        assert_eq!(read.height(), 24);
        let annual = annual_means(&read, "date", "mass_anomaly_gt")?;
        assert_eq!(annual.height(), 2);
        Ok(())
    }

    #[test]
    fn mass_table_with_alternate_column_name_still_reads(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use polars::prelude::*;

        // some tables ship the mass column under a different name, and
        // narrower than f64
        let date = Int32Chunked::from_vec("date".into(), vec![11688, 11719, 11747])
            .into_date()
            .into_series();
        let mass = Series::new("mass_gt".into(), vec![0.0f32, -10.5, -21.0]);
        let df = DataFrame::new(vec![date.into(), mass.into()])?;

        assert_eq!(crate::mass_column(&df)?, "mass_gt");
        let values = crate::mass_values(&df)?;
        assert_eq!(values.len(), 3);
        assert!((values[1] + 10.5).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn elevation_writer_reports_uncreatable_parent() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory")?;

        let grid = demo::demo_elevation_grid(4, 4, 1);
        let nc_path = blocker.join("sub").join("elev.nc");
        assert!(demo::write_elevation_netcdf(&nc_path, &grid).is_err());
        assert!(demo::write_grouped_elevation_netcdf(&nc_path, &grid).is_err());
        Ok(())
    }

    #[test]
    fn missing_csv_falls_back_to_synthetic_table() -> Result<(), Box<dyn std::error::Error>> {
        let config = JobConfig {
            csv_key: "/nonexistent/mass_anomaly.csv".to_string(),
            ..JobConfig::default()
        };
        let df = read_mass_anomaly_or_demo(&config)?;
        assert_eq!(df.height(), demo::DEFAULT_MONTHS);
        Ok(())
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::render::LineSeries;
    use image::Rgb;

    #[test]
    fn colormap_runs_blue_to_red() {
        let cold = render::colormap(0.0);
        let hot = render::colormap(1.0);
        assert!(cold[2] > cold[0]);
        assert!(hot[0] > hot[2]);
    }

    #[test]
    fn grid_map_and_mask_write_png_files() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let grid = demo::demo_elevation_grid(16, 24, 2);
        let map_path = dir.path().join("map.png");
        render::render_grid_map(&grid, &map_path)?;
        assert!(map_path.exists());

        let mask = hotspot_mask(&grid, -2.5, -0.5);
        let mask_path = dir.path().join("mask.png");
        render::render_mask(&mask, &mask_path)?;
        assert!(mask_path.exists());
        Ok(())
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid: Array2<f64> = Array2::zeros((0, 0));
        assert!(render::render_grid_map(&grid, Path::new("unused.png")).is_err());
    }

    #[test]
    fn line_chart_accepts_multiple_series() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("chart.png");
        let monthly: Vec<f64> = (0..48).map(|i| -(i as f64) * 10.0).collect();
        let series = vec![
            LineSeries::from_values(&monthly, Rgb([70, 130, 180])),
            LineSeries {
                xs: vec![5.5, 17.5, 29.5, 41.5],
                ys: vec![-55.0, -175.0, -295.0, -415.0],
                color: Rgb([255, 140, 0]),
            },
        ];
        render::render_line_chart(&series, 400, 200, &path)?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn line_chart_rejects_all_nan_input() {
        let series = vec![LineSeries::from_values(&[f64::NAN, f64::NAN], Rgb([0, 0, 0]))];
        assert!(render::render_line_chart(&series, 100, 100, Path::new("unused.png")).is_err());
    }
}

#[cfg(test)]
mod job_tests {
    use super::*;
    use crate::{DemoOptions, process_demo_job, process_hotspots_job, process_timeseries_job, process_trend_job};

    fn test_config(dir: &Path) -> JobConfig {
        JobConfig {
            nc_key: dir.join("elev.nc").display().to_string(),
            csv_key: dir.join("mass_anomaly.csv").display().to_string(),
            figures_dir: dir.join("figures").display().to_string(),
            hotspot: HotspotParams::default(),
            trend: TrendParams::default(),
        }
    }

    #[test]
    fn demo_then_hotspots_renders_all_figures() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let opts = DemoOptions {
            months: 48,
            grid_size: (24, 24),
            seed: 9,
            grouped: false,
        };
        process_demo_job(&config, &opts)?;
        assert!(config.figure_path("elevation_change_map.png").exists());
        assert!(config.figure_path("mass_balance_timeseries.png").exists());

        let selection = process_hotspots_job(&config)?;
        assert_eq!(selection.variable, "dhdt");
        assert!(config.figure_path("elevation_hotspots.png").exists());
        Ok(())
    }

    #[test]
    fn hotspots_job_handles_grouped_layout() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let opts = DemoOptions {
            months: 48,
            grid_size: (24, 24),
            seed: 9,
            grouped: true,
        };
        process_demo_job(&config, &opts)?;

        let selection = process_hotspots_job(&config)?;
        assert_eq!(selection.group, "grids");
        assert_eq!(selection.confidence, Confidence::Scored);
        Ok(())
    }

    #[test]
    fn trend_and_timeseries_jobs_render_charts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = test_config(dir.path());
        let mut df = demo::demo_mass_anomaly(60, 3)?;
        demo::write_mass_anomaly_csv(&mut df, Path::new(&config.csv_key))?;

        process_trend_job(&config)?;
        assert!(config.figure_path("mass_balance_trend_stl.png").exists());

        process_timeseries_job(&config)?;
        assert!(config.figure_path("mass_balance_timeseries.png").exists());
        Ok(())
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn job_config_from_json_with_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"
        {
            "nc_key": "data/raw/icesat/greenland_elev_change.nc",
            "csv_key": "data/processed/mass_anomaly.csv",
            "figures_dir": "figures"
        }"#;

        let config = JobConfig::from_json(json)?;
        assert_eq!(config.nc_key, "data/raw/icesat/greenland_elev_change.nc");
        assert_eq!(config.hotspot.lower, 0.10);
        assert_eq!(config.hotspot.upper, 0.90);
        assert_eq!(config.trend.period, 12);
        Ok(())
    }

    #[test]
    fn job_config_from_yaml_with_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let yaml = r#"
nc_key: elev.nc
csv_key: mass.csv
figures_dir: out
hotspot:
  lower: 0.05
  upper: 0.95
trend:
  period: 6
"#;
        let config = JobConfig::from_yaml(yaml)?;
        assert_eq!(config.hotspot.lower, 0.05);
        assert_eq!(config.trend.period, 6);
        Ok(())
    }

    #[test]
    fn job_config_file_dispatches_on_extension() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let yaml_path = dir.path().join("config.yaml");
        std::fs::write(&yaml_path, "nc_key: a.nc\ncsv_key: b.csv\nfigures_dir: figs\n")?;
        let config = JobConfig::from_file(&yaml_path)?;
        assert_eq!(config.figures_dir, "figs");

        let json_path = dir.path().join("config.json");
        std::fs::write(
            &json_path,
            r#"{"nc_key":"a.nc","csv_key":"b.csv","figures_dir":"figs2"}"#,
        )?;
        let config = JobConfig::from_file(&json_path)?;
        assert_eq!(config.figures_dir, "figs2");
        Ok(())
    }
}

#[cfg(test)]
mod info_tests {
    use super::*;
    use crate::info::get_netcdf_info;

    #[test]
    fn info_reports_grouped_variables() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("grouped.nc");
        let grid = demo::demo_elevation_grid(8, 8, 4);
        demo::write_grouped_elevation_netcdf(&path, &grid)?;

        let info = get_netcdf_info(&path.display().to_string(), None, true)?;
        assert!(info.groups.contains(&"grids".to_string()));
        let dhdt = info
            .variables
            .iter()
            .find(|v| v.name == "dhdt")
            .expect("dhdt variable reported");
        assert_eq!(dhdt.group, "grids");
        assert_eq!(dhdt.shape, vec![8, 8]);
        assert!(!info.global_attributes.is_empty());
        Ok(())
    }

    #[test]
    fn info_filters_to_requested_variable() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("flat.nc");
        let grid = demo::demo_elevation_grid(4, 4, 4);
        demo::write_elevation_netcdf(&path, &grid)?;

        let info = get_netcdf_info(&path.display().to_string(), Some("dhdt"), false)?;
        assert_eq!(info.total_variables, 1);
        assert_eq!(info.variables[0].name, "dhdt");
        Ok(())
    }
}
