//! # Figure Rendering
//!
//! PNG rendering of the derived products: dh/dt heatmaps, hotspot masks and
//! the mass-anomaly line chart. Maps use one pixel per grid cell with the
//! origin at the lower-left, matching how the grids are plotted elsewhere.

use image::{Rgb, RgbImage};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use ndarray::Array2;
use palette::{Hsl, IntoColor, Srgb};
use std::path::Path;

/// Background color of charts and masks.
const BACKGROUND: Rgb<u8> = Rgb([250, 250, 250]);

/// Hotspot cells in mask figures.
const HOTSPOT_COLOR: Rgb<u8> = Rgb([178, 24, 43]);

/// Maps a normalized value in [0, 1] to a blue-to-red HSL ramp.
pub fn colormap(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0) as f32;
    let hue = 240.0 * (1.0 - t);
    let hsl = Hsl::new(hue, 0.80, 0.50);
    let rgb: Srgb = hsl.into_color();
    Rgb([
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    ])
}

/// Renders a grid as a colormapped heatmap PNG, one pixel per cell,
/// row 0 at the bottom. Non-finite cells render as light gray.
pub fn render_grid_map(grid: &Array2<f64>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (ny, nx) = grid.dim();
    if ny == 0 || nx == 0 {
        return Err("cannot render an empty grid".into());
    }

    let finite: Vec<f64> = grid.iter().copied().filter(|v| v.is_finite()).collect();
    let (min, max) = finite.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let span = if max > min { max - min } else { 1.0 };

    let pb = ProgressBar::new(ny as u64);
    pb.set_style(ProgressStyle::default_bar());

    let mut img = RgbImage::new(nx as u32, ny as u32);
    for j in 0..ny {
        for i in 0..nx {
            let v = grid[[j, i]];
            let pixel = if v.is_finite() {
                colormap((v - min) / span)
            } else {
                Rgb([220, 220, 220])
            };
            // origin lower
            img.put_pixel(i as u32, (ny - 1 - j) as u32, pixel);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    save_png(&img, path)
}

/// Renders a binary hotspot mask: hotspot cells dark red, the rest pale.
pub fn render_mask(mask: &Array2<u8>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (ny, nx) = mask.dim();
    if ny == 0 || nx == 0 {
        return Err("cannot render an empty mask".into());
    }

    let mut img = RgbImage::new(nx as u32, ny as u32);
    for j in 0..ny {
        for i in 0..nx {
            let pixel = if mask[[j, i]] != 0 { HOTSPOT_COLOR } else { BACKGROUND };
            img.put_pixel(i as u32, (ny - 1 - j) as u32, pixel);
        }
    }
    save_png(&img, path)
}

/// One polyline of a chart: x positions, y values and a stroke color.
pub struct LineSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Rgb<u8>,
}

impl LineSeries {
    /// Series plotted against its own sample index.
    pub fn from_values(values: &[f64], color: Rgb<u8>) -> Self {
        LineSeries {
            xs: (0..values.len()).map(|i| i as f64).collect(),
            ys: values.to_vec(),
            color,
        }
    }
}

/// Renders one or more polylines into a PNG with shared axes. The axis
/// range is the envelope of all finite points across the series.
pub fn render_line_chart(
    series: &[LineSeries],
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let margin = 12.0;
    let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for (&x, &y) in s.xs.iter().zip(&s.ys) {
            if x.is_finite() && y.is_finite() {
                x_range = (x_range.0.min(x), x_range.1.max(x));
                y_range = (y_range.0.min(y), y_range.1.max(y));
            }
        }
    }
    if !x_range.0.is_finite() || !y_range.0.is_finite() {
        return Err("no finite points to plot".into());
    }
    let x_span = if x_range.1 > x_range.0 { x_range.1 - x_range.0 } else { 1.0 };
    let y_span = if y_range.1 > y_range.0 { y_range.1 - y_range.0 } else { 1.0 };

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let plot_w = width as f64 - 2.0 * margin;
    let plot_h = height as f64 - 2.0 * margin;

    for s in series {
        let mut prev: Option<(f64, f64)> = None;
        for (&x, &y) in s.xs.iter().zip(&s.ys) {
            if !x.is_finite() || !y.is_finite() {
                prev = None;
                continue;
            }
            let px = margin + (x - x_range.0) / x_span * plot_w;
            let py = margin + (1.0 - (y - y_range.0) / y_span) * plot_h;
            if let Some((x0, y0)) = prev {
                draw_line(&mut img, x0, y0, px, py, s.color);
            }
            prev = Some((px, py));
        }
    }

    save_png(&img, path)
}

fn draw_line(img: &mut RgbImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
    let steps = ((x1 - x0).abs().max((y1 - y0).abs()).ceil() as usize).max(1);
    for k in 0..=steps {
        let t = k as f64 / steps as f64;
        let x = (x0 + t * (x1 - x0)).round();
        let y = (y0 + t * (y1 - y0)).round();
        if x >= 0.0 && y >= 0.0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn save_png(img: &RgbImage, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    info!("wrote figure: {}", path.display());
    Ok(())
}
