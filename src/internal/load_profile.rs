//! Resize profile of `ChainedHashMap` under a random workload.
//!
//! Grows a table with an insert-heavy phase, then drains it with an erase-heavy phase,
//! sampling capacity, load factor and longest collision list after every operation.
//! The samples are drawn to `load_factor.png` and `capacity.png`.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use chainmap::{
    ChainedHashMap, LOWER_LOAD_FACTOR, TableExtensions, UPPER_LOAD_FACTOR,
    logger::initialize_logger,
};
use clap::Parser;
use log::info;
use plotters::prelude::*;
use rand::Rng;

/// Arguments of the resize profiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Operations in each of the growth and drain phases
    #[arg(short, long, default_value_t = 5_000)]
    operations: usize,

    /// Probability that a growth-phase operation is an insert; the drain phase uses the
    /// complement
    #[arg(short, long, default_value_t = 0.8)]
    insert_bias: f64,

    /// Directory the charts are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Table state after one operation
#[derive(Debug, Clone, Copy)]
struct Sample {
    /// Number of buckets
    capacity: usize,
    /// Cached load factor
    load_factor: f64,
    /// Longest collision list
    longest_chain: usize,
}

impl Sample {
    /// Captures the current state of a table
    fn of(table: &ChainedHashMap<u64, u64>) -> Self {
        Self {
            capacity: table.capacity(),
            load_factor: table.load_factor(),
            longest_chain: table.longest_chain(),
        }
    }
}

/// Runs the growth and drain phases and returns one sample per operation
fn run_workload(operations: usize, insert_bias: f64) -> Vec<Sample> {
    let mut rng = rand::rng();
    let mut table = ChainedHashMap::new();
    let mut live: Vec<u64> = Vec::new();
    let mut samples = Vec::with_capacity(operations.saturating_mul(2));
    let bias = insert_bias.clamp(0.0, 1.0);

    for (phase, phase_bias) in [("growth", bias), ("drain", 1.0 - bias)] {
        for _ in 0..operations {
            if live.is_empty() || rng.random_bool(phase_bias) {
                let key: u64 = rng.random();
                if table.insert(key, key) {
                    live.push(key);
                }
            } else {
                let victim = live.swap_remove(rng.random_range(0..live.len()));
                table.erase(&victim);
            }
            samples.push(Sample::of(&table));
        }
        info!(
            "After the {phase} phase: {} entries in {} buckets, load factor {:.3}",
            table.len(),
            table.capacity(),
            table.load_factor()
        );
    }

    samples
}

/// Draws the load factor per operation together with the resize bounds
fn draw_load_factor(samples: &[Sample], path: &Path) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Load Factor per Operation", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..samples.len(), 0.0..1.0)?;

    chart
        .configure_mesh()
        .x_desc("Operation")
        .y_desc("Load Factor")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (bound, label, color) in
        [(UPPER_LOAD_FACTOR, "Grow bound", BLUE), (LOWER_LOAD_FACTOR, "Shrink bound", GREEN)]
    {
        let bound_style = ShapeStyle::from(&color.mix(0.5)).stroke_width(1);
        chart
            .draw_series(LineSeries::new(
                vec![(0, bound), (samples.len(), bound)],
                bound_style,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], bound_style));
    }

    let line_style = ShapeStyle::from(&RED).stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, sample)| (i, sample.load_factor)),
            line_style,
        ))?
        .label("Load factor")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Draws capacity and longest collision list per operation
fn draw_capacity(samples: &[Sample], path: &Path) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_capacity = samples.iter().map(|sample| sample.capacity).max().unwrap_or(1);
    let mut chart = ChartBuilder::on(&root)
        .caption("Capacity and Longest Chain per Operation", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..samples.len(), 0..max_capacity + max_capacity / 10 + 1)?;

    chart
        .configure_mesh()
        .x_desc("Operation")
        .y_desc("Buckets / Entries")
        .axis_desc_style((font_family, 16))
        .draw()?;

    let series: [(&str, RGBColor, fn(&Sample) -> usize); 2] = [
        ("Capacity", RGBColor(50, 90, 220), |sample| sample.capacity),
        ("Longest chain", RGBColor(220, 50, 50), |sample| sample.longest_chain),
    ];
    for (label, color, value) in series {
        let line_style = ShapeStyle::from(&color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                samples.iter().enumerate().map(|(i, sample)| (i, value(sample))),
                line_style,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    let args = Args::parse();

    let samples = run_workload(args.operations, args.insert_bias);
    if samples.is_empty() {
        return Err("at least one operation is required".into());
    }

    let peak = samples.iter().map(|sample| sample.capacity).max().unwrap_or(0);
    println!("Ran {} operations, peak capacity {peak} buckets", samples.len());

    let load_factor_path = args.out_dir.join("load_factor.png");
    let capacity_path = args.out_dir.join("capacity.png");
    draw_load_factor(&samples, &load_factor_path)?;
    draw_capacity(&samples, &capacity_path)?;

    println!(
        "Generated plot images: {}, {}",
        load_factor_path.display(),
        capacity_path.display()
    );
    Ok(())
}
